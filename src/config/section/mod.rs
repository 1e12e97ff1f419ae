//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitepub.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `publish`  | `[publish]`    | Strategy, commit identity, remote target |
//! | `site`     | `[site]`       | Built site version and destination       |

mod publish;
mod site;

pub use publish::{
    CommitConfig, EmptyCommitPolicy, GitPublishConfig, GithubPublishConfig, Provider,
    PublishConfig,
};
pub use site::SiteSectionConfig;
