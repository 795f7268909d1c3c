// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! A flat, JSON-friendly view of every event in a decoded trace, with its
//! stack resolved. Useful for eyeballing what the encoder was given.

use crate::ParseResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedEvent {
    pub r#type: String,
    pub goroutine: u64,
    pub timestamp: i64,
    pub stack: Vec<StackFrame>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackFrame {
    pub func: String,
    pub file: String,
    pub line: i64,
}

/// Projects every event, of any kind, in stream order.
pub fn parsed_events(parsed: &ParseResult) -> Vec<ParsedEvent> {
    parsed
        .events
        .iter()
        .map(|event| ParsedEvent {
            r#type: event.kind.name().to_string(),
            goroutine: event.goroutine,
            timestamp: event.timestamp,
            stack: parsed
                .stack(event.stack_id)
                .iter()
                .map(|frame| StackFrame {
                    func: frame.function.clone(),
                    file: frame.file.clone(),
                    line: frame.line,
                })
                .collect(),
        })
        .collect()
}
