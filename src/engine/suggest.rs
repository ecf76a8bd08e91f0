//! Ranked alternatives for a schedule that cannot be booked as requested.
//!
//! Four axes are searched in a fixed order: start-time shifts, weekday
//! pattern swaps, room substitutions, lecturer substitutions. Every
//! conflict-free candidate gets a score from the policy weights and the
//! cheapest `max_suggestions` survive. The search stops once it has
//! examined `max_candidates` candidates or spent `search_timeout_ms`,
//! returning whatever it found by then, possibly nothing.

use std::time::{Duration, Instant};

use chrono::Duration as TimeDelta;
use serde::{Deserialize, Serialize};

use crate::api::{LecturerId, RoomId};
use crate::engine::conflict::has_conflict;
use crate::engine::expansion::{expand_sessions, session_span};
use crate::engine::index::BookingIndex;
use crate::engine::policy::SuggestPolicy;
use crate::models::catalog::Catalog;
use crate::models::class::ScheduleRequest;
use crate::models::pattern::WeekdayPattern;

/// What a candidate changes relative to the original request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SuggestionChange {
    TimeShift { offset_minutes: i64 },
    PatternSwap { pattern: WeekdayPattern },
    RoomChange { room_id: RoomId, room_name: String },
    LecturerChange { lecturer_id: LecturerId, lecturer_name: String },
}

/// One conflict-free alternative, ready to be booked as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidate {
    /// The adjusted request with the change already applied.
    pub request: ScheduleRequest,
    pub change: SuggestionChange,
    /// Lower is better; zero would be the request itself.
    pub score: f64,
}

struct SearchBudget {
    examined: usize,
    max_candidates: usize,
    deadline: Instant,
}

impl SearchBudget {
    fn new(policy: &SuggestPolicy) -> Self {
        SearchBudget {
            examined: 0,
            max_candidates: policy.max_candidates,
            deadline: Instant::now() + Duration::from_millis(policy.search_timeout_ms),
        }
    }

    /// Account for one candidate; false once the search is out of budget.
    fn allow(&mut self) -> bool {
        if self.examined >= self.max_candidates || Instant::now() >= self.deadline {
            return false;
        }
        self.examined += 1;
        true
    }
}

/// Search for conflict-free variants of `request` and rank them.
///
/// Candidates change exactly one thing each. The result is sorted by
/// ascending score; ties keep generation order, so earlier axes and
/// earlier policy entries win.
pub fn suggest_alternatives(
    index: &BookingIndex,
    catalog: &Catalog,
    request: &ScheduleRequest,
    policy: &SuggestPolicy,
) -> Vec<SuggestionCandidate> {
    let mut found = Vec::new();
    let mut budget = SearchBudget::new(policy);

    for &offset in &policy.time_offsets_minutes {
        if offset == 0 {
            continue;
        }
        let (start, wrapped) = request
            .start_time
            .overflowing_add_signed(TimeDelta::minutes(offset));
        if wrapped != 0 {
            continue;
        }
        let span = match session_span(start, request.duration_minutes) {
            Ok(span) => span,
            Err(_) => continue,
        };
        if !policy.operating_window.admits(&span) {
            continue;
        }
        if !budget.allow() {
            break;
        }
        let mut candidate = request.clone();
        candidate.start_time = start;
        if is_conflict_free(index, &candidate) {
            found.push(SuggestionCandidate {
                request: candidate,
                change: SuggestionChange::TimeShift {
                    offset_minutes: offset,
                },
                score: policy.time_weight * offset.abs() as f64,
            });
        }
    }

    for pattern in &policy.alternate_patterns {
        // Only same-cadence patterns: swapping weekdays keeps the number
        // of sessions per week, so course pacing is preserved.
        if *pattern == request.pattern || pattern.len() != request.pattern.len() {
            continue;
        }
        if !budget.allow() {
            break;
        }
        let mut candidate = request.clone();
        candidate.pattern = pattern.clone();
        if is_conflict_free(index, &candidate) {
            found.push(SuggestionCandidate {
                request: candidate,
                change: SuggestionChange::PatternSwap {
                    pattern: pattern.clone(),
                },
                score: policy.pattern_weight * request.pattern.distance(pattern) as f64,
            });
        }
    }

    let needed_capacity = catalog
        .room(request.room_id)
        .map(|room| room.capacity)
        .unwrap_or(0);
    for room in &catalog.rooms {
        if room.id == request.room_id || room.capacity < needed_capacity {
            continue;
        }
        if !budget.allow() {
            break;
        }
        let mut candidate = request.clone();
        candidate.room_id = room.id;
        if is_conflict_free(index, &candidate) {
            found.push(SuggestionCandidate {
                request: candidate,
                change: SuggestionChange::RoomChange {
                    room_id: room.id,
                    room_name: room.name.clone(),
                },
                score: policy.room_penalty,
            });
        }
    }

    // Substitute lecturers only when the course is known, since a stand-in
    // must actually teach the subject.
    let subject = request
        .course_id
        .and_then(|id| catalog.course(id))
        .map(|course| course.subject.as_str());
    if let Some(subject) = subject {
        for lecturer in &catalog.lecturers {
            if lecturer.id == request.lecturer_id
                || !lecturer.subjects.iter().any(|s| s == subject)
            {
                continue;
            }
            if !budget.allow() {
                break;
            }
            let mut candidate = request.clone();
            candidate.lecturer_id = lecturer.id;
            if is_conflict_free(index, &candidate) {
                found.push(SuggestionCandidate {
                    request: candidate,
                    change: SuggestionChange::LecturerChange {
                        lecturer_id: lecturer.id,
                        lecturer_name: lecturer.name.clone(),
                    },
                    score: policy.lecturer_penalty,
                });
            }
        }
    }

    // Stable sort, so equal scores keep generation order.
    found.sort_by(|a, b| a.score.total_cmp(&b.score));
    found.truncate(policy.max_suggestions);
    found
}

fn is_conflict_free(index: &BookingIndex, request: &ScheduleRequest) -> bool {
    let sessions = match expand_sessions(request) {
        Ok(sessions) => sessions,
        Err(_) => return false,
    };
    // A candidate with no sessions at all books nothing; never suggest it.
    if sessions.is_empty() {
        return false;
    }
    !has_conflict(index, request, &sessions)
}
