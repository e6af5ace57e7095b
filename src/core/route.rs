//! Route stop grouping for display.
//!
//! School stops merge per `(school, stop type)`, other stops per household.
//! Stops with neither key stay on their own line.

use crate::models::route_stop::{RouteStop, StopGroup, StopType};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    School(String, StopType),
    Household(String),
    Single(usize),
}

fn key_for(index: usize, stop: &RouteStop) -> GroupKey {
    if stop.stop_type.is_school() {
        if let Some(school) = &stop.school_id {
            return GroupKey::School(school.clone(), stop.stop_type);
        }
    } else if let Some(household) = &stop.household_id {
        return GroupKey::Household(household.clone());
    }
    GroupKey::Single(index)
}

struct Builder {
    group: StopGroup,
    seen_students: HashSet<String>,
    names: Vec<String>,
}

impl Builder {
    fn start(stop: &RouteStop) -> Self {
        let address = stop
            .address
            .clone()
            .or_else(|| stop.school_address.clone())
            .or_else(|| stop.student_address.clone());

        Self {
            group: StopGroup {
                sequence: stop.sequence,
                stop_type: stop.stop_type,
                school_id: stop.school_id.clone(),
                school_name: stop.school_name.clone(),
                household_id: stop.household_id.clone(),
                student_ids: Vec::new(),
                student_name: String::new(),
                address,
                stop_ids: Vec::new(),
            },
            seen_students: HashSet::new(),
            names: Vec::new(),
        }
    }

    fn add(&mut self, stop: &RouteStop) {
        self.group.sequence = self.group.sequence.min(stop.sequence);
        self.group.stop_ids.push(stop.id.clone());

        let student_key = match (&stop.student_id, &stop.student_name) {
            (Some(id), _) => format!("id:{}", id),
            (None, Some(name)) => format!("name:{}", name),
            (None, None) => return,
        };
        if !self.seen_students.insert(student_key) {
            return;
        }

        if let Some(id) = &stop.student_id {
            self.group.student_ids.push(id.clone());
        }
        if let Some(name) = &stop.student_name {
            self.names.push(name.clone());
        }
    }

    fn finish(mut self) -> StopGroup {
        self.group.student_name = self.names.join(", ");
        self.group
    }
}

/// Merge the stops of one route and order the result by sequence.
pub fn group_stops(stops: &[RouteStop]) -> Vec<StopGroup> {
    let mut builders: Vec<Builder> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for (i, stop) in stops.iter().enumerate() {
        let key = key_for(i, stop);
        let slot = *index.entry(key).or_insert_with(|| {
            builders.push(Builder::start(stop));
            builders.len() - 1
        });
        builders[slot].add(stop);
    }

    let mut groups: Vec<StopGroup> = builders.into_iter().map(Builder::finish).collect();
    // Stable sort: equal sequences keep first-encounter order.
    groups.sort_by_key(|g| g.sequence);

    tracing::debug!(stops = stops.len(), groups = groups.len(), "route stops grouped");
    groups
}
