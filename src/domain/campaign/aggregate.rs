//! Campaign aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CampaignId, Timestamp, UserId, ValidationError};

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A named grouping of coupons with its own active date window.
///
/// Campaigns are soft-deleted: removal deactivates the campaign and its
/// coupons so in-flight orders and usage history keep valid references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Campaign {
    /// Creates a new campaign, enforcing write-time invariants.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is empty or too long, the
    /// description is too long, or `start_at` is not before `end_at`.
    pub fn new(
        id: CampaignId,
        name: String,
        description: Option<String>,
        start_at: Timestamp,
        end_at: Timestamp,
        created_by: UserId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(ValidationError::out_of_range(
                "name_length",
                1,
                MAX_NAME_LEN as i64,
                name.len() as i64,
            ));
        }
        if let Some(desc) = &description {
            if desc.len() > MAX_DESCRIPTION_LEN {
                return Err(ValidationError::out_of_range(
                    "description_length",
                    0,
                    MAX_DESCRIPTION_LEN as i64,
                    desc.len() as i64,
                ));
            }
        }
        Self::validate_window(start_at, end_at)?;

        Ok(Self {
            id,
            name,
            description,
            start_at,
            end_at,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks the date-window invariant shared by create and update.
    pub fn validate_window(start_at: Timestamp, end_at: Timestamp) -> Result<(), ValidationError> {
        if !start_at.is_before(&end_at) {
            return Err(ValidationError::invalid_format(
                "end_at",
                "end date must be after start date",
            ));
        }
        Ok(())
    }

    /// Returns true if the flag is on and `now` falls inside the window.
    pub fn is_currently_active(&self, now: Timestamp) -> bool {
        self.is_active && !now.is_before(&self.start_at) && !now.is_after(&self.end_at)
    }

    /// Switches the campaign on.
    pub fn activate(&mut self, now: Timestamp) {
        self.is_active = true;
        self.updated_at = now;
    }

    /// Switches the campaign off.
    pub fn deactivate(&mut self, now: Timestamp) {
        self.is_active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_campaign() -> Campaign {
        let now = Timestamp::now();
        Campaign::new(
            CampaignId::new(),
            "Summer Sale".to_string(),
            Some("Seasonal discounts".to_string()),
            now.minus_days(1),
            now.add_days(30),
            UserId::new(),
            now,
        )
        .unwrap()
    }

    #[test]
    fn new_campaign_is_active() {
        assert!(base_campaign().is_active);
    }

    #[test]
    fn rejects_empty_name() {
        let now = Timestamp::now();
        let result = Campaign::new(
            CampaignId::new(),
            "   ".to_string(),
            None,
            now,
            now.add_days(1),
            UserId::new(),
            now,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_end_before_start() {
        let now = Timestamp::now();
        let result = Campaign::new(
            CampaignId::new(),
            "Backwards".to_string(),
            None,
            now.add_days(5),
            now.add_days(1),
            UserId::new(),
            now,
        );
        assert!(result.is_err());
    }

    #[test]
    fn name_is_trimmed() {
        let now = Timestamp::now();
        let campaign = Campaign::new(
            CampaignId::new(),
            "  Summer Sale  ".to_string(),
            None,
            now,
            now.add_days(1),
            UserId::new(),
            now,
        )
        .unwrap();
        assert_eq!(campaign.name, "Summer Sale");
    }

    #[test]
    fn currently_active_respects_flag_and_window() {
        let mut campaign = base_campaign();
        let now = Timestamp::now();
        assert!(campaign.is_currently_active(now));

        campaign.deactivate(now);
        assert!(!campaign.is_currently_active(now));

        campaign.activate(now);
        assert!(!campaign.is_currently_active(now.add_days(60)));
        assert!(!campaign.is_currently_active(now.minus_days(10)));
    }
}
