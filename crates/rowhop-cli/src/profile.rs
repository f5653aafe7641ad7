use crate::ExtractArgs;
use anyhow::Context;
use rowhop_rpc::Profile;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::fs;

///
/// StoredProfile
///
/// On-disk connection profile. The secret is deliberately never read from
/// disk; it comes from the flag or the ROWHOP_SECRET environment variable.
///

#[derive(Default, Deserialize)]
struct StoredProfile {
    url: Option<String>,
    db: Option<String>,
    username: Option<String>,
    #[serde(default)]
    context: Map<String, Json>,
}

/// Merge CLI flags over the optional profile file into connection settings.
pub(crate) fn resolve(args: &ExtractArgs) -> anyhow::Result<Profile> {
    let stored = match &args.profile {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            serde_json::from_str::<StoredProfile>(&text)
                .with_context(|| format!("parsing profile {}", path.display()))?
        }
        None => StoredProfile::default(),
    };

    let url = args
        .url
        .clone()
        .or(stored.url)
        .context("missing --url (or profile url)")?;
    let db = args
        .db
        .clone()
        .or(stored.db)
        .context("missing --db (or profile db)")?;
    let username = args
        .user
        .clone()
        .or(stored.username)
        .context("missing --user (or profile username)")?;
    let secret = args
        .secret
        .clone()
        .context("missing --secret (or ROWHOP_SECRET)")?;

    Ok(Profile {
        url,
        db,
        username,
        secret,
        context: stored.context,
    })
}
