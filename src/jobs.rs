use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u32);

impl JobId {
    pub fn new(id: u32) -> JobId {
        JobId(id)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
}

/// A background child tracked by the shell.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub pid: Pid,
    /// The command exactly as typed, trailing `&` included.
    pub cmd: String,
    pub state: JobState,
}

/// Owns the shell's knowledge of its live background children.
///
/// Ids are the smallest non-negative integers not currently in use, so they
/// stay small and are recycled as jobs disappear.
#[derive(Debug, Default)]
pub struct JobTable {
    entries: BTreeMap<u32, Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending job-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.entries.values()
    }

    pub fn add(&mut self, pid: Pid, cmd: String) -> JobId {
        // Ids count only live children, so finished ones must go first.
        self.reap_finished();
        let id = self.alloc_job_id();
        self.entries.insert(
            id,
            Job {
                id: JobId(id),
                pid,
                cmd,
                state: JobState::Running,
            },
        );
        JobId(id)
    }

    fn alloc_job_id(&self) -> u32 {
        let mut id = 0;
        while self.entries.contains_key(&id) {
            id += 1;
        }
        id
    }

    pub fn get(&self, id: u32) -> Option<&Job> {
        self.entries.get(&id)
    }

    /// Removes and returns a job, freeing its id for reuse.
    pub fn take(&mut self, id: u32) -> Option<Job> {
        self.entries.remove(&id)
    }

    pub fn max_id(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    /// Removes all jobs in ascending id order.
    pub fn drain(&mut self) -> Vec<Job> {
        let entries = std::mem::take(&mut self.entries);
        entries.into_values().collect()
    }

    fn remove_by_pid(&mut self, pid: Pid) {
        if let Some(id) = self
            .entries
            .iter()
            .find(|(_, job)| job.pid == pid)
            .map(|(id, _)| *id)
        {
            self.entries.remove(&id);
        }
    }

    fn set_state_by_pid(&mut self, pid: Pid, state: JobState) {
        if let Some(job) = self.entries.values_mut().find(|job| job.pid == pid) {
            job.state = state;
        }
    }

    /// Reaps every finished child without blocking, dropping the table
    /// entries of children that exited or were killed and updating the state
    /// of stopped or continued ones.
    pub fn reap_finished(&mut self) {
        let options = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
        loop {
            match waitpid(None, Some(options)) {
                Ok(WaitStatus::Exited(pid, status)) => {
                    debug!("reaped pid={} status={}", pid, status);
                    self.remove_by_pid(pid);
                }
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    debug!("reaped pid={} killed by {:?}", pid, signal);
                    self.remove_by_pid(pid);
                }
                Ok(WaitStatus::Stopped(pid, _)) => {
                    self.set_state_by_pid(pid, JobState::Stopped);
                }
                Ok(WaitStatus::Continued(pid)) => {
                    self.set_state_by_pid(pid, JobState::Running);
                }
                Ok(WaitStatus::StillAlive) | Err(_) => break,
                Ok(other) => {
                    debug!("unexpected waitpid event: {:?}", other);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: i32) -> Pid {
        Pid::from_raw(n)
    }

    #[test]
    fn ids_start_at_zero_and_count_up() {
        let mut table = JobTable::new();
        assert_eq!(table.add(pid(100), "sleep 1 &".into()), JobId::new(0));
        assert_eq!(table.add(pid(101), "sleep 2 &".into()), JobId::new(1));
        assert_eq!(table.add(pid(102), "sleep 3 &".into()), JobId::new(2));
        assert_eq!(table.max_id(), Some(2));
    }

    #[test]
    fn freed_ids_are_recycled_smallest_first() {
        let mut table = JobTable::new();
        table.add(pid(100), "a &".into());
        table.add(pid(101), "b &".into());
        table.add(pid(102), "c &".into());
        assert!(table.take(1).is_some());
        assert_eq!(table.add(pid(103), "d &".into()), JobId::new(1));
        assert!(table.take(0).is_some());
        assert!(table.take(1).is_some());
        assert_eq!(table.add(pid(104), "e &".into()), JobId::new(0));
        assert_eq!(table.add(pid(105), "f &".into()), JobId::new(1));
    }

    #[test]
    fn iteration_is_ascending() {
        let mut table = JobTable::new();
        table.add(pid(100), "a &".into());
        table.add(pid(101), "b &".into());
        table.add(pid(102), "c &".into());
        table.take(1);
        table.add(pid(103), "d &".into());
        let ids: Vec<u32> = table.iter().map(|job| job.id.0).collect();
        assert_eq!(ids, [0, 1, 2]);
        let pids: Vec<i32> = table.iter().map(|job| job.pid.as_raw()).collect();
        assert_eq!(pids, [100, 103, 102]);
    }

    #[test]
    fn take_of_an_unknown_id_is_none() {
        let mut table = JobTable::new();
        assert!(table.take(7).is_none());
        assert!(table.get(0).is_none());
        assert!(table.is_empty());
        assert_eq!(table.max_id(), None);
    }
}
