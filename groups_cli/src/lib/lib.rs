//! Full CLI library for declarative group management
//!

#![deny(missing_docs)]

mod apply;
mod cmd;
mod plan;
mod project;
mod state;

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use human_panic::setup_panic;

use groups_core::{
    client::GroupId,
    config::{fetch_credentials, GroupsFile},
    logging::{self, debug, warn},
    GroupResource, Timeouts,
};
use groups_nerdgraph::{NerdGraphClient, NerdGraphCredentials, NerdGraphRestConfig};

use cmd::{GroupsArgs, GroupsCommand};
use state::StateFile;

/// Main CLI entrypoint.
pub async fn cli() -> Result<()> {
    setup_panic!();
    let args = GroupsArgs::parse();
    logging::setup(args.log_level);

    let resource = new_resource(&args)?;

    match &args.command {
        GroupsCommand::Plan => {
            let config = read_config(&args.config)?;
            let state = StateFile::load(&args.state).await?;
            plan::plan(&resource, &config, state).await?;
        }
        GroupsCommand::Apply => {
            let config = read_config(&args.config)?;
            apply::apply(&resource, &config, &args.state).await?;
        }
        GroupsCommand::Read { address } => {
            let mut state = StateFile::load(&args.state).await?;
            let id = match state.groups.get(address) {
                Some(recorded) => recorded.id.to_owned(),
                None => bail!("{address} is not in the state"),
            };
            match resource.read(&id).await? {
                Some(current) => {
                    println!("{}", serde_json::to_string_pretty(&current)?);
                    state.groups.insert(address.to_owned(), current);
                }
                None => {
                    warn!("group {id} ({address}) no longer exists; removing it from the state");
                    state.groups.remove(address);
                }
            }
            state.save(&args.state).await?;
        }
        GroupsCommand::Import { address, group_id } => {
            let mut state = StateFile::load(&args.state).await?;
            if state.groups.contains_key(address) {
                bail!("{address} is already in the state");
            }
            let imported = resource
                .import(&GroupId(group_id.to_owned()))
                .await
                .with_context(|| format!("importing {group_id} as {address}"))?;
            println!("{}", serde_json::to_string_pretty(&imported)?);
            state.groups.insert(address.to_owned(), imported);
            state.save(&args.state).await?;
        }
        GroupsCommand::Destroy { address } => {
            apply::destroy(&resource, address.as_deref(), &args.state).await?;
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<GroupsFile> {
    let config = GroupsFile::read_from_file(path).map_err(|e| {
        anyhow!(
            "unable to read {} - make sure you are in a directory with a groups config: {e:#}",
            path.display()
        )
    })?;
    config.validate()?;
    Ok(config)
}

fn new_resource(args: &GroupsArgs) -> Result<GroupResource<NerdGraphClient>> {
    let creds_path = project::credentials_path(args.credentials.as_ref())?;
    let mut credentials = fetch_credentials(&creds_path)?;
    let creds_map = credentials
        .remove(project::NERDGRAPH_CREDENTIALS_KEY)
        .ok_or_else(|| {
            anyhow!(
                "no `{}` entry in {}",
                project::NERDGRAPH_CREDENTIALS_KEY,
                creds_path.display()
            )
        })?;
    let creds = NerdGraphCredentials::from_map(&creds_map)?;
    debug!("using credentials {creds:?}");

    let client = NerdGraphClient::new(creds, NerdGraphRestConfig { retry: true })?;
    Ok(GroupResource::new(
        Arc::new(client),
        Timeouts {
            read: Duration::from_secs(args.read_timeout),
        },
    ))
}
