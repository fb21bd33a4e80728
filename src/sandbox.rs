//! Runtime-detection environment invalidation for no-runtime runs.
//!
//! The CLI locates package managers through `<PREFIX>_<PM>_PATH` variables.
//! Negative runs point every one of them at a bogus path, under both prefix
//! generations. Two strategies exist:
//!
//! - [`EnvOverlay`]: the invalid values are handed to the child process only;
//!   the harness environment is never touched.
//! - [`EnvSandbox`]: the harness environment itself is mutated and restored
//!   when the guard drops. Not reentrant or thread-safe; callers must not run
//!   sandboxed sections concurrently.
use crate::runtime::{env_var_name, RuntimeDescriptor, ENV_PREFIXES, KNOWN_PACKAGE_MANAGERS};
use std::ffi::OsString;
use std::process::Command;

pub const INVALID_SENTINEL: &str = "INVALID";

/// Held by tests that mutate or hand children the real runtime variable names.
#[cfg(test)]
pub(crate) static RUNTIME_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Every variable that could point the CLI at a working package manager,
/// starting with the runtime's own.
pub fn runtime_env_var_names(descriptor: &RuntimeDescriptor) -> Vec<String> {
    let mut names = descriptor.env_var_names();
    for package_manager in KNOWN_PACKAGE_MANAGERS {
        for prefix in ENV_PREFIXES {
            let name = env_var_name(prefix, package_manager);
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Per-invocation environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: Vec<(String, String)>,
}

impl EnvOverlay {
    pub fn invalidated(names: &[String]) -> Self {
        EnvOverlay {
            vars: names
                .iter()
                .map(|name| (name.clone(), INVALID_SENTINEL.to_string()))
                .collect(),
        }
    }

    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    pub fn apply(&self, command: &mut Command) {
        for (key, value) in &self.vars {
            command.env(key, value);
        }
    }
}

/// Scoped mutation of the process environment.
///
/// Holds the prior state of each variable it changed, in mutation order. Drop
/// unwinds last-in-first-out: prior values are reassigned and previously unset
/// variables are removed again.
#[derive(Debug)]
pub struct EnvSandbox {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvSandbox {
    pub fn invalidate(names: &[String]) -> Self {
        let mut sandbox = EnvSandbox {
            saved: Vec::with_capacity(names.len()),
        };
        for name in names {
            if sandbox.saved.iter().any(|(saved, _)| saved == name) {
                continue;
            }
            sandbox.saved.push((name.clone(), std::env::var_os(name)));
            std::env::set_var(name, INVALID_SENTINEL);
        }
        tracing::debug!(count = sandbox.saved.len(), "runtime environment invalidated");
        sandbox
    }
}

impl Drop for EnvSandbox {
    fn drop(&mut self) {
        while let Some((name, prior)) = self.saved.pop() {
            match prior {
                Some(value) => std::env::set_var(&name, value),
                None => std::env::remove_var(&name),
            }
        }
        tracing::debug!("runtime environment restored");
    }
}

/// Runs `body` with every runtime path variable set to the invalid sentinel,
/// restoring the prior environment afterwards even if `body` fails or panics.
pub fn with_invalidated_runtime_env<T>(
    descriptor: &RuntimeDescriptor,
    body: impl FnOnce() -> T,
) -> T {
    with_invalidated_env(&runtime_env_var_names(descriptor), body)
}

pub fn with_invalidated_env<T>(names: &[String], body: impl FnOnce() -> T) -> T {
    let _sandbox = EnvSandbox::invalidate(names);
    body()
}
