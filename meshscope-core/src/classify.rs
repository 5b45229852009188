// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Connectivity classification

use crate::model::TrafficClass;

/// Classify traffic between two endpoints by their owning groups
pub fn classify(group_a: Option<&str>, group_b: Option<&str>) -> TrafficClass {
    match (group_a, group_b) {
        (Some(a), Some(b)) if a == b => TrafficClass::SameGroup,
        (Some(_), Some(_)) => TrafficClass::CrossGroup,
        _ => TrafficClass::UnknownGroup,
    }
}
