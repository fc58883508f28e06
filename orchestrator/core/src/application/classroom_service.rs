// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Implements the one piece of classroom behavior that is domain logic
//! rather than CRUD: cloning a template topology into per-student copies and
//! minting the one-use code each student redeems to reach theirs.

use rand::distr::{Alphanumeric, SampleString};

use crate::domain::classroom::JoinCode;
use crate::domain::topology::Topology;

const JOIN_CODE_LEN: usize = 10;

fn generate_join_code() -> JoinCode {
    JoinCode(Alphanumeric.sample_string(&mut rand::rng(), JOIN_CODE_LEN))
}

/// Deep-clones `template` `count` times, one [`Topology`] and one
/// [`JoinCode`] per slot. Each clone's label is `"{label_prefix} {n}"`
/// (1-indexed). Ids inside the cloned topology are left exactly as
/// authored — the caller assigns each clone a fresh topology id when it
/// persists it, since that persistence is outside this crate.
pub fn instantiate(template: &Topology, count: u32, label_prefix: &str) -> Vec<(String, Topology, JoinCode)> {
    (1..=count)
        .map(|n| {
            let label = format!("{label_prefix} {n}");
            (label, template.clone(), generate_join_code())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::topology::Topology;

    #[test]
    fn instantiate_produces_count_distinct_slots() {
        let template = Topology { name: Some("template".into()), ..Default::default() };
        let slots = instantiate(&template, 5, "Student");

        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0].0, "Student 1");
        assert_eq!(slots[4].0, "Student 5");

        let codes: std::collections::HashSet<_> = slots.iter().map(|(_, _, code)| code.as_str().to_string()).collect();
        assert_eq!(codes.len(), 5, "join codes must not collide");

        for (_, topo, _) in &slots {
            assert_eq!(topo.name.as_deref(), Some("template"));
        }
    }
}
