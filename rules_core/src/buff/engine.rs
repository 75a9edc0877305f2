//! BuffEngine - applies buff/debuff increments to the global ledger

use super::{Bucket, BuffError, BuffTrack, LedgerBucket, LedgerEntry, LedgerStore, SLOT_COUNT};
use crate::config::{BuffPolicy, RuleConfig};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Net effect of one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuffApplication {
    pub bucket: Bucket,
    /// Net change per ledger track (after clamping under tug-of-war)
    pub changes: Vec<(BuffTrack, i64)>,
}

impl BuffApplication {
    pub fn change(&self, track: BuffTrack) -> i64 {
        self.changes
            .iter()
            .filter(|(t, _)| *t == track)
            .map(|(_, delta)| delta)
            .sum()
    }
}

/// Applies buffs to a [`LedgerStore`].
///
/// Each call reads the bucket, stages every requested track and writes the
/// bucket back only if the whole request succeeded.
pub struct BuffEngine<S: LedgerStore> {
    store: S,
    update: Mutex<()>,
}

impl<S: LedgerStore> BuffEngine<S> {
    pub fn new(store: S) -> Self {
        BuffEngine {
            store,
            update: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply up to four increments to each targeted track.
    pub fn apply_buffs(
        &self,
        values: [i64; SLOT_COUNT],
        targets: &[BuffTrack],
        to_friendly: bool,
        config: &RuleConfig,
    ) -> Result<BuffApplication, BuffError> {
        let bucket = Bucket::for_side(to_friendly);
        let _guard = self.update.lock();
        let mut staged = self.store.load(bucket);

        let changes = match config.buff_policy {
            BuffPolicy::Slots => {
                stack_slots(&mut staged, &values, targets, config.let_buffs_ride)?
            }
            BuffPolicy::TugOfWar => tug_of_war(
                &mut staged,
                &values,
                targets,
                config.tug_of_war_min,
                config.tug_of_war_max,
            ),
        };

        self.store.store(bucket, staged);
        debug!(bucket = bucket.key(), ?changes, "buffs applied");
        Ok(BuffApplication { bucket, changes })
    }
}

fn stack_slots(
    staged: &mut LedgerBucket,
    values: &[i64],
    targets: &[BuffTrack],
    ride: bool,
) -> Result<Vec<(BuffTrack, i64)>, BuffError> {
    let mut changes = Vec::with_capacity(targets.len());
    for track in targets {
        let (mut amount, mut count) = match staged.get(*track) {
            Some(LedgerEntry::Slots { amount, count }) => (amount, count),
            Some(LedgerEntry::Clamped(amount)) => (amount, 0),
            None => (0, 0),
        };
        let start = amount;

        for value in values.iter().copied().filter(|v| *v != 0) {
            if (count as usize) < SLOT_COUNT {
                amount += value;
                count += 1;
            } else if ride {
                break;
            } else {
                warn!(?track, "max buff stack reached");
                return Err(BuffError::MaxStackReached { track: *track });
            }
        }

        staged.set(*track, LedgerEntry::Slots { amount, count });
        changes.push((*track, amount - start));
    }
    Ok(changes)
}

fn tug_of_war(
    staged: &mut LedgerBucket,
    values: &[i64],
    targets: &[BuffTrack],
    min: i64,
    max: i64,
) -> Vec<(BuffTrack, i64)> {
    let mut changes = Vec::with_capacity(targets.len());
    for track in targets {
        let key = track.paired_buff();
        let sign = if track.is_debuff() { -1 } else { 1 };
        let start = staged.amount(key);

        let mut amount = start;
        for value in values.iter().copied().filter(|v| *v != 0) {
            amount = (amount + sign * value).clamp(min, max);
        }

        staged.set(key, LedgerEntry::Clamped(amount));
        changes.push((key, amount - start));
    }
    changes
}
