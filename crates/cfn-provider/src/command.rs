//! `aws cloudformation` invocation builder

use async_process::Command as AsyncCommand;
use std::collections::BTreeMap;
use std::fmt;

/// A single `aws cloudformation <operation>` invocation
///
/// Unlike `async_process::Command`, this type is `Clone` and comparable, so
/// runners can record or replay it and it converts to a real process only in
/// [`AwsCommand::prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCommand {
    /// Program to execute
    program: String,
    /// CloudFormation operation, e.g. `list-stacks`
    operation: String,
    /// Operation arguments
    args: Vec<String>,
    /// `--region`
    region: Option<String>,
    /// `--profile`
    profile: Option<String>,
    /// Extra environment
    env: BTreeMap<String, String>,
}

impl AwsCommand {
    /// Invocation of `operation` through the `aws` program
    pub fn new(operation: impl Into<String>) -> Self {
        let mut env = BTreeMap::new();
        // Keep the CLI from piping JSON through a pager
        env.insert("AWS_PAGER".to_string(), String::new());

        Self {
            program: "aws".to_string(),
            operation: operation.into(),
            args: Vec::new(),
            region: None,
            profile: None,
            env,
        }
    }

    /// Use a different executable than `aws`
    pub fn program(&mut self, program: impl Into<String>) -> &mut Self {
        self.program = program.into();
        self
    }

    /// Add an argument
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    /// Add `flag value`
    pub fn opt(&mut self, flag: &str, value: impl Into<String>) -> &mut Self {
        self.arg(flag).arg(value)
    }

    /// Set the region, if any
    pub fn region(&mut self, region: Option<&str>) -> &mut Self {
        self.region = region.map(str::to_string);
        self
    }

    /// Set the credentials profile, if any
    pub fn profile(&mut self, profile: Option<&str>) -> &mut Self {
        self.profile = profile.map(str::to_string);
        self
    }

    /// Set an environment variable
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The CloudFormation operation
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The program to execute
    pub fn get_program(&self) -> &str {
        &self.program
    }

    /// Environment variables set on the process
    pub fn get_envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Full argument vector, excluding the program
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["cloudformation".to_string(), self.operation.clone()];
        args.extend(self.args.iter().cloned());
        args.extend(["--output".to_string(), "json".to_string()]);
        if let Some(region) = &self.region {
            args.extend(["--region".to_string(), region.clone()]);
        }
        if let Some(profile) = &self.profile {
            args.extend(["--profile".to_string(), profile.clone()]);
        }
        args
    }

    /// Prepare this command for execution by converting to an `async_process::Command`
    pub fn prepare(&self) -> AsyncCommand {
        let mut cmd = AsyncCommand::new(&self.program);
        cmd.args(self.to_args());
        for (key, val) in &self.env {
            cmd.env(key, val);
        }
        cmd
    }
}

impl fmt::Display for AwsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in self.to_args() {
            // Template bodies are long; keep log lines readable
            if arg.len() > 60 {
                write!(f, " <{} bytes>", arg.len())?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
