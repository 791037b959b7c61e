//! Per-lesson "attempted" markers for auto-triggered generation.
//!
//! A slot per `(lesson id, asset kind)`; a job may only be dispatched from
//! `Idle`, which is what keeps repeated triggers down to one provider call.
//! Jobs cancelled by leaving a lesson stay known until their result shows up;
//! `clear` forgets every job.

use std::collections::{HashMap, HashSet};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Video,
    Audio,
}

#[derive(Debug, Clone)]
enum Slot {
    Pending { job: Uuid, cancel: CancellationToken },
    Done,
    Failed { message: String },
}

/// Read-only view of a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    Pending,
    Done,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct GenerationGuard {
    slots: HashMap<(String, AssetKind), Slot>,
    retired: HashSet<Uuid>,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, lesson_id: &str, kind: AssetKind) -> SlotState {
        match self.slots.get(&(lesson_id.to_string(), kind)) {
            None => SlotState::Idle,
            Some(Slot::Pending { .. }) => SlotState::Pending,
            Some(Slot::Done) => SlotState::Done,
            Some(Slot::Failed { message }) => SlotState::Failed(message.clone()),
        }
    }

    /// Claims the slot. `None` if a job is pending, done or failed.
    pub fn try_begin(
        &mut self,
        lesson_id: &str,
        kind: AssetKind,
    ) -> Option<(Uuid, CancellationToken)> {
        let key = (lesson_id.to_string(), kind);
        if self.slots.contains_key(&key) {
            return None;
        }
        let job = Uuid::new_v4();
        let cancel = CancellationToken::new();
        self.slots.insert(
            key,
            Slot::Pending {
                job,
                cancel: cancel.clone(),
            },
        );
        Some((job, cancel))
    }

    /// Whether a result for `job` may still be used: it is the slot's pending
    /// job, or one cancelled by leaving its lesson (consumed here).
    pub fn accept(&mut self, lesson_id: &str, kind: AssetKind, job: Uuid) -> bool {
        let pending = matches!(
            self.slots.get(&(lesson_id.to_string(), kind)),
            Some(Slot::Pending { job: current, .. }) if *current == job
        );
        pending || self.retired.remove(&job)
    }

    #[cfg(test)]
    pub(crate) fn pending_job(&self, lesson_id: &str, kind: AssetKind) -> Option<Uuid> {
        match self.slots.get(&(lesson_id.to_string(), kind)) {
            Some(Slot::Pending { job, .. }) => Some(*job),
            _ => None,
        }
    }

    /// Marks the job done. Returns false for a stale job id.
    pub fn finish(&mut self, lesson_id: &str, kind: AssetKind, job: Uuid) -> bool {
        self.settle(lesson_id, kind, job, Slot::Done)
    }

    pub fn fail(&mut self, lesson_id: &str, kind: AssetKind, job: Uuid, message: String) -> bool {
        self.settle(lesson_id, kind, job, Slot::Failed { message })
    }

    /// Re-arms a failed slot so the automatic trigger can fire again.
    pub fn retry(&mut self, lesson_id: &str, kind: AssetKind) -> bool {
        let key = (lesson_id.to_string(), kind);
        if matches!(self.slots.get(&key), Some(Slot::Failed { .. })) {
            self.slots.remove(&key);
            return true;
        }
        false
    }

    /// Resets every marker of a lesson the learner is leaving, cancelling pending jobs.
    pub fn leave_lesson(&mut self, lesson_id: &str) {
        let retired = &mut self.retired;
        self.slots.retain(|(id, _), slot| {
            if id != lesson_id {
                return true;
            }
            if let Slot::Pending { job, cancel } = slot {
                cancel.cancel();
                retired.insert(*job);
            }
            false
        });
    }

    /// Cancels everything. Results of earlier jobs are no longer accepted.
    pub fn clear(&mut self) {
        for slot in self.slots.values() {
            if let Slot::Pending { cancel, .. } = slot {
                cancel.cancel();
            }
        }
        self.slots.clear();
        self.retired.clear();
    }

    fn settle(&mut self, lesson_id: &str, kind: AssetKind, job: Uuid, next: Slot) -> bool {
        let key = (lesson_id.to_string(), kind);
        match self.slots.get(&key) {
            Some(Slot::Pending { job: current, .. }) if *current == job => {
                self.slots.insert(key, next);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_job_per_slot() {
        let mut guard = GenerationGuard::new();
        assert!(guard.try_begin("l1", AssetKind::Video).is_some());
        assert!(guard.try_begin("l1", AssetKind::Video).is_none());
        assert!(guard.try_begin("l1", AssetKind::Audio).is_some());
        assert!(guard.try_begin("l2", AssetKind::Video).is_some());
    }

    #[test]
    fn stale_job_ids_are_ignored() {
        let mut guard = GenerationGuard::new();
        let (job, _) = guard.try_begin("l1", AssetKind::Video).unwrap();
        assert!(!guard.finish("l1", AssetKind::Video, Uuid::new_v4()));
        assert_eq!(guard.state("l1", AssetKind::Video), SlotState::Pending);
        assert!(guard.finish("l1", AssetKind::Video, job));
        assert_eq!(guard.state("l1", AssetKind::Video), SlotState::Done);
    }

    #[test]
    fn retry_rearms_only_failed_slots() {
        let mut guard = GenerationGuard::new();
        let (job, _) = guard.try_begin("l1", AssetKind::Video).unwrap();
        assert!(!guard.retry("l1", AssetKind::Video));
        guard.fail("l1", AssetKind::Video, job, "boom".into());
        assert_eq!(
            guard.state("l1", AssetKind::Video),
            SlotState::Failed("boom".into())
        );
        assert!(guard.try_begin("l1", AssetKind::Video).is_none());
        assert!(guard.retry("l1", AssetKind::Video));
        assert!(guard.try_begin("l1", AssetKind::Video).is_some());
    }

    #[test]
    fn leaving_a_lesson_cancels_and_resets_it() {
        let mut guard = GenerationGuard::new();
        let (_, cancel) = guard.try_begin("l1", AssetKind::Video).unwrap();
        let (_, other) = guard.try_begin("l2", AssetKind::Video).unwrap();
        guard.leave_lesson("l1");
        assert!(cancel.is_cancelled());
        assert!(!other.is_cancelled());
        assert_eq!(guard.state("l1", AssetKind::Video), SlotState::Idle);

        guard.clear();
        assert!(other.is_cancelled());
    }

    #[test]
    fn left_jobs_are_accepted_once_and_cleared_jobs_never() {
        let mut guard = GenerationGuard::new();
        let (left, _) = guard.try_begin("l1", AssetKind::Audio).unwrap();
        let (live, _) = guard.try_begin("l2", AssetKind::Audio).unwrap();
        assert!(guard.accept("l2", AssetKind::Audio, live));
        assert!(!guard.accept("l2", AssetKind::Audio, Uuid::new_v4()));

        guard.leave_lesson("l1");
        assert!(guard.accept("l1", AssetKind::Audio, left));
        assert!(!guard.accept("l1", AssetKind::Audio, left));

        let (before_reset, _) = guard.try_begin("l1", AssetKind::Video).unwrap();
        guard.leave_lesson("l1");
        guard.clear();
        assert!(!guard.accept("l1", AssetKind::Video, before_reset));
        assert!(!guard.accept("l2", AssetKind::Audio, live));
    }
}
