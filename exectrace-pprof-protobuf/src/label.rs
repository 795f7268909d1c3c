// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{Record, StringOffset, OPT_ZERO};

/// Label includes additional context for this sample. It can include things
/// like a thread id, allocation size, etc.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct Label {
    /// An index into the string table.
    pub key: Record<StringOffset, 1, OPT_ZERO>,
    /// At most one of the following must be present.
    pub str: Record<StringOffset, 2, OPT_ZERO>,
    pub num: Record<i64, 3, OPT_ZERO>,
    /// Should only be present when num is present.
    /// Specifies the units of num.
    pub num_unit: Record<StringOffset, 4, OPT_ZERO>,
}

impl Label {
    /// A label with a string value, which is the only kind execution-trace
    /// label sets carry.
    pub fn str(key: StringOffset, str: StringOffset) -> Self {
        Self {
            key: Record::from(key),
            str: Record::from(str),
            ..Self::default()
        }
    }
}

impl_message!(Label { key, str, num, num_unit });

#[cfg(feature = "prost_impls")]
impl From<Label> for crate::prost_impls::Label {
    fn from(label: Label) -> Self {
        Self::from(&label)
    }
}

#[cfg(feature = "prost_impls")]
impl From<&Label> for crate::prost_impls::Label {
    fn from(label: &Label) -> Self {
        Self {
            key: label.key.value.into(),
            str: label.str.value.into(),
            num: label.num.value,
            num_unit: label.num_unit.value.into(),
        }
    }
}

#[cfg(all(test, feature = "prost_impls"))]
mod tests {
    use super::*;
    use crate::{prost_impls, Value};
    use prost::Message;

    #[test]
    fn roundtrip() {
        fn test(label: &Label) {
            let mut buffer = Vec::new();
            let prost_label = prost_impls::Label::from(label);
            assert_eq!(i64::from(label.key.value), prost_label.key);
            assert_eq!(i64::from(label.str.value), prost_label.str);
            assert_eq!(label.num.value, prost_label.num);
            assert_eq!(i64::from(label.num_unit.value), prost_label.num_unit);

            label.encode(&mut buffer).unwrap();
            let roundtrip = prost_impls::Label::decode(buffer.as_slice()).unwrap();
            assert_eq!(prost_label, roundtrip);
        }

        bolero::check!().with_type::<Label>().for_each(test);
    }

    #[test]
    fn str_label() {
        let label = Label::str(StringOffset::new(4), StringOffset::new(5));
        let mut buffer = Vec::new();
        label.encode(&mut buffer).unwrap();
        assert_eq!(&[0x08, 0x04, 0x10, 0x05], buffer.as_slice());
    }
}
