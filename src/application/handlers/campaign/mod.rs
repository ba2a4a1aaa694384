//! Campaign handlers.

mod manage_campaigns;

pub use manage_campaigns::{
    CampaignAdminHandler, CampaignDeletion, CreateCampaignCommand, UpdateCampaignCommand,
};
