use std::thread;
use std::time::Duration;
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, Signal, System};

/// Terminates every running playback process.
pub trait Reap: Send {
    /// Returns the number of matching processes that were found.
    fn reap(&self) -> usize;
}

/// Finds processes by case-insensitive name substring and terminates them,
/// gracefully first, then forcibly after a grace period.
#[derive(Debug, Clone)]
pub struct ProcessReaper {
    process_name: String,
    grace: Duration,
}

impl ProcessReaper {
    pub fn new(process_name: &str, grace: Duration) -> Self {
        Self {
            process_name: process_name.to_lowercase(),
            grace,
        }
    }

    fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.process_name)
    }

    fn find_matches(&self, system: &System) -> Vec<(Pid, String)> {
        let own_pid = sysinfo::get_current_pid().ok();
        system
            .processes()
            .iter()
            .filter(|(pid, _)| Some(**pid) != own_pid)
            .filter(|(_, process)| process.status() != ProcessStatus::Zombie)
            // Linux lists every task; threads share their process's name
            .filter(|(_, process)| process.thread_kind().is_none())
            .filter_map(|(pid, process)| {
                let name = process.name().to_string_lossy().to_string();
                self.matches(&name).then_some((*pid, name))
            })
            .collect()
    }

    fn terminate(&self, system: &mut System, pid: Pid, name: &str) {
        let graceful = match system.process(pid) {
            Some(process) => process.kill_with(Signal::Term),
            None => return,
        };

        match graceful {
            Some(true) => thread::sleep(self.grace),
            Some(false) => log::warn!("Graceful terminate of {} ({}) failed", name, pid),
            None => log::debug!("Graceful terminate not supported on this platform for {} ({})", name, pid),
        }

        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let still_alive = system
            .process(pid)
            .map(|process| process.status() != ProcessStatus::Zombie)
            .unwrap_or(false);

        if still_alive {
            log::info!("{} ({}) still running, killing", name, pid);
            if let Some(process) = system.process(pid) {
                if !process.kill() {
                    log::error!("Failed to kill {} ({})", name, pid);
                }
            }
        }
    }
}

impl Reap for ProcessReaper {
    fn reap(&self) -> usize {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let matches = self.find_matches(&system);
        if matches.is_empty() {
            log::debug!("No running '{}' processes", self.process_name);
            return 0;
        }

        log::info!("Stopping {} '{}' instance(s)...", matches.len(), self.process_name);
        for (pid, name) in &matches {
            self.terminate(&mut system, *pid, name);
        }
        log::info!("All '{}' instances closed", self.process_name);
        matches.len()
    }
}
