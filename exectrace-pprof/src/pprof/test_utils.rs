// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::ProfileError;
use exectrace_pprof_protobuf::prost_impls::{Function, Location, Profile};
use flate2::read::GzDecoder;
use prost::Message;
use std::io::Read;

pub fn deserialize_pprof(encoded: &[u8]) -> Result<Profile, ProfileError> {
    Profile::decode(encoded)
        .map_err(|err| ProfileError::invalid_input(format!("failed to decode pprof: {err}")))
}

pub fn deserialize_compressed_pprof(encoded: &[u8]) -> Result<Profile, ProfileError> {
    let mut buf = Vec::new();
    GzDecoder::new(encoded).read_to_end(&mut buf)?;
    deserialize_pprof(&buf)
}

pub fn string_table_fetch(profile: &Profile, id: i64) -> Option<&str> {
    let index = usize::try_from(id).ok()?;
    profile.string_table.get(index).map(String::as_str)
}

pub fn function_by_id(profile: &Profile, id: u64) -> Option<&Function> {
    profile.functions.iter().find(|f| f.id == id)
}

pub fn location_by_id(profile: &Profile, id: u64) -> Option<&Location> {
    profile.locations.iter().find(|l| l.id == id)
}

/// Returns the field number of every top-level record, in the order they
/// appear in the encoded profile.
pub fn top_level_fields(mut encoded: &[u8]) -> Result<Vec<u32>, ProfileError> {
    let invalid = |err: prost::DecodeError| ProfileError::invalid_input(err.to_string());
    let mut fields = Vec::new();
    while !encoded.is_empty() {
        let key = prost::encoding::decode_varint(&mut encoded).map_err(invalid)?;
        let field = u32::try_from(key >> 3)?;
        match key & 0x7 {
            0 => {
                prost::encoding::decode_varint(&mut encoded).map_err(invalid)?;
            }
            2 => {
                let len = prost::encoding::decode_varint(&mut encoded).map_err(invalid)?;
                let len = usize::try_from(len)?;
                if len > encoded.len() {
                    return Err(ProfileError::invalid_input(format!(
                        "field {field} claims {len} bytes but only {} remain",
                        encoded.len()
                    )));
                }
                encoded = &encoded[len..];
            }
            wire_type => {
                return Err(ProfileError::invalid_input(format!(
                    "unexpected wire type {wire_type} for field {field}"
                )))
            }
        }
        fields.push(field);
    }
    Ok(fields)
}
