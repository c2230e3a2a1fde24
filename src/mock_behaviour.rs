//! This module provides ways to tweak the mocked task API, so that it can return errors on some tests

use crate::error::{Error, Result};

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub login_behaviour: (u32, u32),
    pub setup_demo_behaviour: (u32, u32),
    pub get_tasks_behaviour: (u32, u32),
    pub create_task_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            login_behaviour: (0, n_fails),
            setup_demo_behaviour: (0, n_fails),
            get_tasks_behaviour: (0, n_fails),
            create_task_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_login(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.login_behaviour, "login")
    }
    pub fn can_setup_demo(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.setup_demo_behaviour, "setup_demo")
    }
    pub fn can_get_tasks(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_tasks_behaviour, "get_tasks")
    }
    pub fn can_create_task(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_task_behaviour, "create_task")
    }
    pub fn can_update_task(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_task_behaviour, "update_task")
    }
    pub fn can_delete_task(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_task_behaviour, "delete_task")
    }
}


/// Consume one scripted outcome of `(successes, failures)`: successes first, then failures, then success forever
fn decrement(script: &mut (u32, u32), operation: &str) -> Result<()> {
    match script {
        (successes, _) if *successes > 0 => {
            *successes -= 1;
            Ok(())
        },
        (_, failures) if *failures > 0 => {
            *failures -= 1;
            log::debug!("Mocked task API: refusing {} ({} more failures scripted)", operation, failures);
            Err(Error::Other(format!("mocked task API refused {}", operation)))
        },
        _ => Ok(()),
    }
}
