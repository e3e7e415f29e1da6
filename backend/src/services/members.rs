//! Member listing queries
//!
//! Two mutually exclusive modes over the user collection: a single-record
//! lookup by id, and a cursor-paginated listing filtered by the embedded
//! active-gym name. Pages are fixed at 10 records in the store's natural
//! order; `has_more` comes from a one-record lookahead past the page.
//!
//! The optional `birthday`/`payments` sorts reorder only the fetched page
//! (missing keys last). This is a documented limitation, not global
//! ordering: the cursor still follows natural order, so chained pages never
//! skip or repeat records.

use super::collections;
use crate::error::ApiError;
use crate::store::DocumentStore;
use gym_manager_shared::types::{MemberDetail, MemberSummary};
use serde_json::json;

pub const PAGE_SIZE: usize = 10;

/// One page of a member listing.
#[derive(Debug, Clone)]
pub struct MemberPage {
    pub members: Vec<MemberSummary>,
    pub last_doc_id: Option<String>,
    pub has_more: bool,
}

impl MemberPage {
    fn empty() -> Self {
        Self {
            members: Vec::new(),
            last_doc_id: None,
            has_more: false,
        }
    }
}

/// Which in-page sorts to apply, in application order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSort {
    pub birthday: bool,
    pub payments: bool,
}

pub struct MemberService;

impl MemberService {
    /// Single-record mode: fetch one member in the listing shape.
    pub async fn get_member(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<MemberSummary, ApiError> {
        let doc = store
            .get(collections::USERS, user_id)
            .await
            .map_err(|e| ApiError::internal("get user details", e))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(MemberSummary::from_doc(user_id, &doc))
    }

    /// Detail mode: fetch one member in the full denormalized shape.
    pub async fn get_member_detail(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<MemberDetail, ApiError> {
        let doc = store
            .get(collections::USERS, user_id)
            .await
            .map_err(|e| ApiError::internal("get user detailing", e))?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(MemberDetail::from_doc(user_id, &doc))
    }

    /// Collection mode: one page of members of the named gym.
    ///
    /// An unresolvable cursor degrades to an empty page with
    /// `has_more=false` rather than an error.
    pub async fn list_page(
        store: &dyn DocumentStore,
        gym_name: &str,
        cursor: Option<&str>,
        sort: PageSort,
    ) -> Result<MemberPage, ApiError> {
        let internal = |e| ApiError::internal("get user details", e);

        if let Some(cursor_id) = cursor {
            let resolved = store
                .get(collections::USERS, cursor_id)
                .await
                .map_err(internal)?;
            if resolved.is_none() {
                return Ok(MemberPage::empty());
            }
        }

        let filter = json!(gym_name);
        let rows = store
            .query_eq(
                collections::USERS,
                "active_gym.gym_name",
                &filter,
                PAGE_SIZE,
                cursor,
            )
            .await
            .map_err(internal)?;

        if rows.is_empty() {
            return Ok(MemberPage::empty());
        }

        // The cursor tracks natural order, so it is taken before any
        // display sort is applied.
        let last_doc_id = rows.last().map(|(id, _)| id.clone());

        let mut members: Vec<MemberSummary> = rows
            .iter()
            .map(|(id, doc)| MemberSummary::from_doc(id, doc))
            .collect();

        if sort.birthday {
            sort_by_day(&mut members, |m| m.date_of_birth.as_deref());
        }
        if sort.payments {
            sort_by_day(&mut members, |m| m.fees_due_date.as_deref());
        }

        let has_more = match &last_doc_id {
            Some(last) => !store
                .query_eq(
                    collections::USERS,
                    "active_gym.gym_name",
                    &filter,
                    1,
                    Some(last),
                )
                .await
                .map_err(internal)?
                .is_empty(),
            None => false,
        };

        Ok(MemberPage {
            members,
            last_doc_id,
            has_more,
        })
    }
}

/// Ascending sort on a `YYYY-MM-DD` key; records without the key sort last.
/// Day strings compare lexicographically in chronological order.
fn sort_by_day<F>(members: &mut [MemberSummary], key: F)
where
    F: Fn(&MemberSummary) -> Option<&str>,
{
    members.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
