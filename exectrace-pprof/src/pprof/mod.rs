// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Reading profiles back, mostly for tests.

mod test_utils;

pub use exectrace_pprof_protobuf::prost_impls::*;
pub use test_utils::*;
