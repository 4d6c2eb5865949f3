//! Oneof grouping: cluster fields of a mutually exclusive union by their
//! shared storage offset, keeping first-appearance order.
//!
//! A oneof member may carry the field width's all-bits-set value as its
//! data_offset, meaning "same group as the previous oneof field". The pass
//! is a fold over the decoded list carrying that one piece of state.

use crate::config::FieldWidth;
use crate::errors::{PbreconError, Result};
use crate::record::FieldInfo;
use crate::scalar::RepeatRule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Members of one oneof union. Non-empty; every member stores its value at
/// `data_offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneofGroup {
    pub data_offset: u64,
    pub members: Vec<FieldInfo>,
}

/// Element of the grouped field list handed to the schema emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupedField {
    Single(FieldInfo),
    Oneof(OneofGroup),
}

/// Cluster oneof members by storage offset. Groups land at the position of
/// their first member; non-oneof fields pass through unchanged.
///
/// Fails with [`PbreconError::MissingOneofStart`] when the first oneof
/// field in the sequence already claims to continue a previous group.
pub fn group_fields(
    fields: Vec<FieldInfo>,
    field_width: FieldWidth,
) -> Result<Vec<GroupedField>> {
    let sentinel = field_width.sentinel();
    let mut result: Vec<GroupedField> = Vec::with_capacity(fields.len());
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut last_offset: Option<u64> = None;

    for field in fields {
        if field.repeat != RepeatRule::Oneof {
            result.push(GroupedField::Single(field));
            continue;
        }

        let offset = if u64::from(field.data_offset) == sentinel {
            last_offset.ok_or(PbreconError::MissingOneofStart)?
        } else {
            u64::from(field.data_offset)
        };

        match slots.get(&offset) {
            Some(&i) => {
                if let GroupedField::Oneof(group) = &mut result[i] {
                    group.members.push(field);
                }
            }
            None => {
                slots.insert(offset, result.len());
                result.push(GroupedField::Oneof(OneofGroup {
                    data_offset: offset,
                    members: vec![field],
                }));
            }
        }
        last_offset = Some(offset);
    }

    Ok(result)
}

/// Flatten a grouped list back to a plain field sequence; each group
/// expands in place at its first-appearance position.
pub fn ungroup(grouped: Vec<GroupedField>) -> Vec<FieldInfo> {
    let mut out = Vec::new();
    for entry in grouped {
        match entry {
            GroupedField::Single(f) => out.push(f),
            GroupedField::Oneof(g) => out.extend(g.members),
        }
    }
    out
}
