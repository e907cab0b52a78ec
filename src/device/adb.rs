//! Device control through the `adb` command line tool

use std::ffi::OsString;
use std::process::{Command, Output};

use super::DeviceController;
use crate::config::AdbConfig;
use crate::planner::Swipe;
use crate::vision::Screenshot;
use crate::{Error, Result};

/// Talks to a phone by running `adb` subprocesses
#[derive(Debug, Clone)]
pub struct AdbController {
    config: AdbConfig,
}

impl AdbController {
    pub fn new(config: AdbConfig) -> Self {
        Self { config }
    }

    /// Arguments for a command, prefixed with `-s <serial>` when configured
    fn device_args(&self, args: &[OsString]) -> Vec<OsString> {
        let mut all = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = &self.config.serial {
            all.push(OsString::from("-s"));
            all.push(OsString::from(serial));
        }
        all.extend(args.iter().cloned());
        all
    }

    fn command_line(&self, args: &[OsString]) -> String {
        let mut line = self.config.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Run adb with `args` and fail on a non-zero exit
    fn run(&self, args: Vec<OsString>) -> Result<Output> {
        let command = self.command_line(&args);
        log::debug!("{}", command);

        let output = Command::new(&self.config.program)
            .args(&args)
            .output()
            .map_err(|source| Error::Command {
                program: self.config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    fn capture_args(&self) -> Vec<OsString> {
        self.device_args(&[
            "shell".into(),
            "screencap".into(),
            "-p".into(),
            self.config.remote_path.clone().into(),
        ])
    }

    fn pull_args(&self) -> Vec<OsString> {
        self.device_args(&[
            "pull".into(),
            self.config.remote_path.clone().into(),
            self.config.local_path.clone().into_os_string(),
        ])
    }

    /// The adb server is shared by all devices, so no `-s`
    fn teardown_args(&self) -> Vec<OsString> {
        vec!["kill-server".into()]
    }

    fn swipe_args(&self, swipe: &Swipe) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["shell".into(), "input".into(), "swipe".into()];
        args.extend(swipe.args().into_iter().map(OsString::from));
        self.device_args(&args)
    }
}

impl DeviceController for AdbController {
    fn capture_screen(&mut self) -> Result<()> {
        self.run(self.capture_args())?;
        Ok(())
    }

    fn fetch_screen(&mut self) -> Result<Screenshot> {
        self.run(self.pull_args())?;
        Screenshot::open(&self.config.local_path)
    }

    fn swipe(&mut self, swipe: &Swipe) -> Result<()> {
        let args = self.swipe_args(swipe);
        log::info!("{}", self.command_line(&args));
        self.run(args)?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        log::info!("Stopping adb server");
        self.run(self.teardown_args())?;
        Ok(())
    }
}
