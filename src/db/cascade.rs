use crate::AppResult;

use super::{
    DocId, Store,
    events::{delete_event, require_event},
    profiles::{require_profile, save_profile},
};

/// Removes the first occurrence of `id`, scanning front to back.
pub fn remove_first(list: &mut Vec<String>, id: &str) -> bool {
    match list.iter().position(|item| item == id) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

/// What a cascade deletion touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub event_id: DocId,
    pub organiser: String,
    /// Profile writes made, organiser included. A participant listed twice is
    /// scrubbed twice.
    pub profiles_updated: usize,
}

impl Store {
    /// Deletes an event and scrubs its id from the organiser's hosted and
    /// history lists and from every participant's history and participated lists.
    ///
    /// Every referenced profile is loaded before anything is written, and the
    /// whole operation commits as one transaction: a missing profile (or a
    /// failure at any later step) leaves every document untouched.
    pub async fn delete_event_cascade(&self, id: &DocId) -> AppResult<CascadeReport> {
        let mut tx = self.begin_write().await?;

        let event = require_event(&mut tx, id).await?;
        require_profile(&mut tx, &event.organiser).await?;
        for participant in &event.participants {
            require_profile(&mut tx, participant).await?;
        }

        let mut organiser = require_profile(&mut tx, &event.organiser).await?;
        remove_first(&mut organiser.event_hosted, id.as_str());
        remove_first(&mut organiser.event_history, id.as_str());
        save_profile(&mut tx, &organiser).await?;

        // re-read each time so repeated emails see the previous write
        for participant in &event.participants {
            let mut profile = require_profile(&mut tx, participant).await?;
            remove_first(&mut profile.event_history, id.as_str());
            remove_first(&mut profile.event_participated, id.as_str());
            save_profile(&mut tx, &profile).await?;
        }

        delete_event(&mut tx, id).await?;
        tx.commit().await?;

        let report = CascadeReport {
            event_id: id.clone(),
            organiser: event.organiser,
            profiles_updated: 1 + event.participants.len(),
        };
        tracing::info!(
            event_id = %report.event_id,
            organiser = %report.organiser,
            profiles_updated = report.profiles_updated,
            "event deleted"
        );
        Ok(report)
    }
}
