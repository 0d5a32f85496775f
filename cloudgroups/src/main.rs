// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::io::Write;

use anyhow::Context as _;
use clap::Parser;
use log::debug;

use cloudgroups::google::{
    list_groups, new_service_with_delegation, new_service_without_delegation,
    verify_token_access, ServiceConfig, CLOUD_IDENTITY_ENDPOINT, GOOGLE_APPLICATION_CREDENTIALS,
    REQUIRED_SCOPES,
};
use cloudgroups::{default_context, Context, Error};

const DESCRIPTION: &str = concat!(
    "Verifies that a service account can mint an access token, then lists the ",
    "Cloud Identity groups of a customer twice: once as the service account and ",
    "once impersonating the delegated user through domain-wide delegation."
);

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = DESCRIPTION)]
struct Args {
    /// Path to the service account key file. A leading `~/` is expanded.
    #[arg(long, env = GOOGLE_APPLICATION_CREDENTIALS)]
    credentials: String,

    /// The user to impersonate. Leave empty to skip delegation.
    #[arg(long, env = "CLOUDGROUPS_DELEGATED_USER", default_value = "")]
    delegated_user: String,

    /// The customer whose groups are listed, e.g. `C03ygpcl8`.
    #[arg(long, env = "CLOUDGROUPS_CUSTOMER_ID")]
    customer_id: String,

    /// Maximum number of groups printed per listing.
    #[arg(
        long,
        env = "CLOUDGROUPS_PAGE_SIZE",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    page_size: u32,

    /// Scopes requested for verification and delegated access.
    ///
    /// May be repeated. Defaults to the Cloud Identity and Admin SDK group scopes.
    #[arg(long = "scope")]
    scopes: Vec<String>,

    /// The Cloud Identity API endpoint.
    #[arg(long, env = "CLOUDGROUPS_ENDPOINT", default_value = CLOUD_IDENTITY_ENDPOINT)]
    endpoint: String,

    /// Print only the first and last characters of the acquired access token.
    #[arg(long)]
    redact_token: bool,
}

impl Args {
    fn config(&self, ctx: &Context) -> anyhow::Result<ServiceConfig> {
        let path = ctx.expand_home_dir(&self.credentials).ok_or_else(|| {
            Error::path_resolution(format!(
                "failed to expand home directory in {}",
                self.credentials
            ))
        })?;

        let scopes = if self.scopes.is_empty() {
            REQUIRED_SCOPES.iter().map(|v| v.to_string()).collect()
        } else {
            self.scopes.clone()
        };

        let config = ServiceConfig::new(
            &path,
            self.delegated_user.as_str(),
            self.customer_id.as_str(),
        )?
        .with_scopes(scopes)
        .with_endpoint(self.endpoint.as_str());
        Ok(config)
    }
}

async fn run(args: &Args, ctx: &Context, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = args.config(ctx).context("failed to load configuration")?;
    debug!("loaded configuration: {config:?}");

    verify_token_access(ctx, &config, out, args.redact_token)
        .await
        .context("token verification failed")?;
    writeln!(out, "Token verification successful")?;

    let client = new_service_without_delegation(ctx, &config)
        .await
        .context("failed to create service without delegation")?;
    writeln!(out, "Successfully created service without delegation")?;
    list_groups(&client, config.customer_id(), args.page_size, out)
        .await
        .context("failed to list groups without delegation")?;

    let client = new_service_with_delegation(ctx, &config)
        .await
        .context("failed to create service with delegation")?;
    writeln!(out, "Successfully created service with delegation")?;
    list_groups(&client, config.customer_id(), args.page_size, out)
        .await
        .context("failed to list groups with delegation")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let ctx = default_context();

    let mut stdout = std::io::stdout().lock();
    run(&args, &ctx, &mut stdout).await
}
