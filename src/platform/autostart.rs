//! Run-at-login registration.
//!
//! The registration is a single value under the per-user run key, named
//! after the app, holding the absolute executable path. All operations are
//! best-effort: a failed read counts as "not registered" and a failed write
//! simply leaves the feature off.

use std::path::Path;

/// Registry path of the per-user run-at-login list.
#[cfg(windows)]
const RUN_KEY_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
/// Value name the app registers itself under.
#[cfg(windows)]
const RUN_VALUE_NAME: &str = "CursorCat";

/// Storage backing the run-at-login registration.
pub trait RunAtLogin {
    /// The registered launch command, if any.
    fn command(&self) -> Option<String>;
    /// Register `cmd` to run at login.
    fn set_command(&mut self, cmd: &str);
    /// Remove the registration.
    fn clear(&mut self);
}

/// Whether the app is currently registered to run at login.
pub fn is_enabled(backend: &dyn RunAtLogin) -> bool {
    backend.command().is_some()
}

/// Flip the registration: registered becomes removed, absent becomes
/// registered with the given executable path.
pub fn toggle(backend: &mut dyn RunAtLogin, exe_path: &Path) {
    if is_enabled(backend) {
        backend.clear();
    } else {
        backend.set_command(&exe_path.to_string_lossy());
    }
}

/// `RunAtLogin` backed by the HKCU run key.
#[cfg(windows)]
pub struct RegistryRunAtLogin;

#[cfg(windows)]
impl RunAtLogin for RegistryRunAtLogin {
    fn command(&self) -> Option<String> {
        let hkcu = winreg::RegKey::predef(winreg::enums::HKEY_CURRENT_USER);
        let key = hkcu
            .open_subkey_with_flags(RUN_KEY_PATH, winreg::enums::KEY_READ)
            .ok()?;
        key.get_value::<String, _>(RUN_VALUE_NAME).ok()
    }

    fn set_command(&mut self, cmd: &str) {
        let hkcu = winreg::RegKey::predef(winreg::enums::HKEY_CURRENT_USER);
        if let Ok((key, _)) = hkcu.create_subkey_with_flags(RUN_KEY_PATH, winreg::enums::KEY_WRITE)
        {
            let _ = key.set_value(RUN_VALUE_NAME, &cmd);
        }
    }

    fn clear(&mut self) {
        let hkcu = winreg::RegKey::predef(winreg::enums::HKEY_CURRENT_USER);
        if let Ok(key) = hkcu.open_subkey_with_flags(RUN_KEY_PATH, winreg::enums::KEY_WRITE) {
            let _ = key.delete_value(RUN_VALUE_NAME);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// In-memory stand-in for the registry run key.
    #[derive(Default)]
    struct MockRunAtLogin {
        command: Option<String>,
    }

    impl RunAtLogin for MockRunAtLogin {
        fn command(&self) -> Option<String> {
            self.command.clone()
        }
        fn set_command(&mut self, cmd: &str) {
            self.command = Some(cmd.to_string());
        }
        fn clear(&mut self) {
            self.command = None;
        }
    }

    #[test]
    fn toggle_registers_executable_path() {
        let mut backend = MockRunAtLogin::default();
        assert!(!is_enabled(&backend));

        toggle(&mut backend, Path::new("/opt/cursorcat/cursorcat"));
        assert!(is_enabled(&backend));
        assert_eq!(backend.command().unwrap(), "/opt/cursorcat/cursorcat");
    }

    #[test]
    fn toggle_twice_round_trips() {
        let exe = PathBuf::from("/opt/cursorcat/cursorcat");

        let mut backend = MockRunAtLogin::default();
        toggle(&mut backend, &exe);
        toggle(&mut backend, &exe);
        assert!(!is_enabled(&backend));

        backend.set_command("stale-entry");
        toggle(&mut backend, &exe);
        toggle(&mut backend, &exe);
        assert!(is_enabled(&backend));
    }
}
