// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The dedup tables and the aggregate model the encoder builds before it
//! writes anything. All of them are owned by a single encode call.

mod aggregate;
mod function;
mod label_set;
mod location;
mod symbol_index;

pub use aggregate::*;
pub use function::*;
pub use label_set::*;
pub use location::*;
pub use symbol_index::*;
