//! Canned runner for provider tests

#![allow(dead_code)]

use async_trait::async_trait;
use cfn_provider::{AwsCommand, ProviderError, Runner};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replays scripted stdout (or a failure) per operation and records every
/// argument vector it was asked to run
#[derive(Default)]
pub struct CannedRunner {
    responses: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    invocations: Mutex<Vec<Vec<String>>>,
}

impl CannedRunner {
    pub fn respond(self, operation: &str, stdout: &str) -> Self {
        self.push(operation, Ok(stdout.to_string()))
    }

    pub fn fail(self, operation: &str, stderr: &str) -> Self {
        self.push(operation, Err(stderr.to_string()))
    }

    fn push(self, operation: &str, response: Result<String, String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn last_args(&self) -> Vec<String> {
        self.invocations().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Runner for CannedRunner {
    async fn run(&self, command: &AwsCommand) -> cfn_provider::Result<Vec<u8>> {
        self.invocations.lock().unwrap().push(command.to_args());

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(command.operation())
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(stdout)) => Ok(stdout.into_bytes()),
            Some(Err(stderr)) => Err(ProviderError::CommandFailed {
                operation: command.operation().to_string(),
                code: Some(254),
                stderr,
            }),
            None => panic!("no canned response for {}", command.operation()),
        }
    }
}
