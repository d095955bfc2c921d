pub mod dto;

pub use dto::{
    FilterSet, SummaryAggregate, TeamStats, UploadCommitResponse, UploadPreviewResponse,
};
