//! Command line surface.
//!
//! Argument types stay here; every command delegates to a use case from
//! [`UseCases`] and writes its human-readable result to `out`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use sf_app::usecases::admin::{ReportKind, SponsorshipDecision};
use sf_app::UseCases;
use sf_core::admin::{PaymentStatus, SponsorData};
use sf_core::api::endpoints;
use sf_core::catalog::{self, NewSport, SportType};
use sf_core::export::ExportFormat;
use sf_core::ids::{InstitutionId, SportId};
use sf_core::ports::ApiTransportExt;
use sf_core::registration::fees::format_amount;

#[derive(Debug, Parser)]
#[command(name = "sportsfest", version, about = "Sports festival registration client")]
pub struct Cli {
    /// Config file (defaults to $SPORTSFEST_CONFIG or the data dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the backend answers
    Health,
    /// Browse the built-in sports catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Show the registration fee for a number of sports
    Fee {
        #[arg(long)]
        sports: usize,
    },
    Login(Credentials),
    Logout,
    /// Print the signed-in identity
    Whoami,
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    Sports {
        #[arg(long = "type", value_enum)]
        sport_type: Option<SportTypeArg>,
    },
    Categories { sport: String },
    Subcategories { sport: String, category: String },
    Institutes,
    /// Categories the backend publishes for a sport id
    Remote { sport_id: String },
}

#[derive(Debug, Args)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    Login(Credentials),
    Logout,
    /// Fetch institutions and sponsorship requests and print the dashboard
    Load,
    Approve {
        institution_id: InstitutionId,
        #[arg(long)]
        sponsor: String,
        /// Sponsored amount in cents
        #[arg(long)]
        amount: u64,
    },
    Reject {
        institution_id: InstitutionId,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Record a payment against an institution
    Pay {
        institution_id: InstitutionId,
        #[arg(long, value_enum)]
        status: PaymentStatusArg,
        /// Total paid so far, in cents
        #[arg(long)]
        amount: u64,
    },
    Export {
        #[arg(value_enum)]
        kind: ReportKindArg,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormatArg::Csv)]
        format: ExportFormatArg,
    },
    #[command(subcommand)]
    Sports(SportsCommand),
}

#[derive(Debug, Subcommand)]
pub enum SportsCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Remove { sport_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SportTypeArg {
    Team,
    Individual,
}

impl From<SportTypeArg> for SportType {
    fn from(arg: SportTypeArg) -> Self {
        match arg {
            SportTypeArg::Team => SportType::Team,
            SportTypeArg::Individual => SportType::Individual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaymentStatusArg {
    Paid,
    Partial,
    Pending,
}

impl From<PaymentStatusArg> for PaymentStatus {
    fn from(arg: PaymentStatusArg) -> Self {
        match arg {
            PaymentStatusArg::Paid => PaymentStatus::Paid,
            PaymentStatusArg::Partial => PaymentStatus::Partial,
            PaymentStatusArg::Pending => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKindArg {
    Institutions,
    Sponsorships,
}

impl From<ReportKindArg> for ReportKind {
    fn from(arg: ReportKindArg) -> Self {
        match arg {
            ReportKindArg::Institutions => ReportKind::Institutions,
            ReportKindArg::Sponsorships => ReportKind::Sponsorships,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Excel,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Excel => ExportFormat::Excel,
        }
    }
}

pub async fn run<W: Write + Send>(command: Command, usecases: &UseCases, out: &mut W) -> Result<()> {
    match command {
        Command::Health => {
            let response = usecases.deps().api.get(endpoints::HEALTHZ).await?;
            writeln!(out, "{} {}", response.status, response.body)?;
        }
        Command::Catalog(command) => run_catalog(command, usecases, out).await?,
        Command::Fee { sports } => {
            let breakdown = usecases.deps().fees.breakdown(sports);
            writeln!(
                out,
                "base {} + {} x {} = {}",
                format_amount(breakdown.base, &breakdown.currency),
                breakdown.sports_count,
                format_amount(breakdown.per_sport, &breakdown.currency),
                breakdown.display_total()
            )?;
        }
        Command::Login(credentials) => {
            let identity = usecases
                .auth_session()
                .login(&credentials.email, &credentials.password)
                .await?;
            writeln!(out, "Signed in as {}", identity.email)?;
        }
        Command::Logout => {
            usecases.auth_session().logout().await?;
            writeln!(out, "Signed out")?;
        }
        Command::Whoami => match usecases.auth_session().restore().await? {
            Some(identity) => {
                let name = if identity.name.is_empty() {
                    "(no name)"
                } else {
                    identity.name.as_str()
                };
                let verified = if identity.is_verified { "verified" } else { "unverified" };
                writeln!(out, "{} <{}> {}", name, identity.email, verified)?;
            }
            None => writeln!(out, "Not signed in")?,
        },
        Command::Admin(command) => run_admin(command, usecases, out).await?,
    }
    Ok(())
}

async fn run_catalog<W: Write + Send>(
    command: CatalogCommand,
    usecases: &UseCases,
    out: &mut W,
) -> Result<()> {
    match command {
        CatalogCommand::Sports { sport_type } => {
            let names: Vec<&str> = match sport_type {
                Some(sport_type) => catalog::sports_for_type(sport_type.into()),
                None => catalog::all_sports().iter().map(|s| s.name).collect(),
            };
            print_lines(out, names)?;
        }
        CatalogCommand::Categories { sport } => {
            print_lines(out, catalog::categories_for_sport(&sport))?;
        }
        CatalogCommand::Subcategories { sport, category } => {
            print_lines(out, catalog::subcategories_for(&sport, &category))?;
        }
        CatalogCommand::Institutes => {
            print_lines(out, catalog::institutes().iter().copied())?;
        }
        CatalogCommand::Remote { sport_id } => {
            let categories = usecases
                .list_sport_categories()
                .execute(&SportId::from(sport_id))
                .await?;
            for category in categories {
                writeln!(
                    out,
                    "{}\t{}-{}\t{:?}\t{}",
                    category.name,
                    category.age_from,
                    category.age_to,
                    category.gender_allowed,
                    category.fee
                )?;
            }
        }
    }
    Ok(())
}

async fn run_admin<W: Write + Send>(
    command: AdminCommand,
    usecases: &UseCases,
    out: &mut W,
) -> Result<()> {
    let gate = usecases.admin_gate();

    if let AdminCommand::Login(credentials) = &command {
        let session = gate.login(&credentials.email, &credentials.password).await?;
        writeln!(out, "Admin session opened for {}", session.email)?;
        return Ok(());
    }
    if let AdminCommand::Logout = &command {
        gate.sign_out().await?;
        writeln!(out, "Admin session closed")?;
        return Ok(());
    }

    gate.require_admin().await?;

    match command {
        AdminCommand::Login(_) | AdminCommand::Logout => {}
        AdminCommand::Load => {
            let stats = usecases.load_admin_data().execute().await?;
            let currency = &usecases.deps().fees.currency;
            writeln!(out, "institutions      {}", stats.total_institutions)?;
            writeln!(
                out,
                "paid/partial/pending {}/{}/{}",
                stats.paid, stats.partial, stats.pending
            )?;
            writeln!(out, "collected         {}", format_amount(stats.collected, currency))?;
            writeln!(out, "outstanding       {}", format_amount(stats.outstanding, currency))?;
            writeln!(out, "pending requests  {}", stats.pending_requests)?;
            writeln!(out, "sponsored total   {}", format_amount(stats.sponsored_total, currency))?;
        }
        AdminCommand::Approve {
            institution_id,
            sponsor,
            amount,
        } => {
            let decision = SponsorshipDecision::Approve(SponsorData {
                sponsor_name: sponsor,
                sponsored_amount: amount,
            });
            review(usecases, institution_id, decision).await?;
            writeln!(out, "Sponsorship for institution {institution_id} approved")?;
        }
        AdminCommand::Reject {
            institution_id,
            reason,
        } => {
            review(usecases, institution_id, SponsorshipDecision::Reject { reason }).await?;
            writeln!(out, "Sponsorship for institution {institution_id} rejected")?;
        }
        AdminCommand::Pay {
            institution_id,
            status,
            amount,
        } => {
            usecases.load_admin_data().execute().await?;
            usecases
                .record_payment()
                .execute(institution_id, status.into(), amount)
                .await?;
            writeln!(out, "Payment recorded for institution {institution_id}")?;
        }
        AdminCommand::Export { kind, out: path, format } => {
            usecases.load_admin_data().execute().await?;
            let report = usecases.export_report().execute(kind.into(), format.into());
            tokio::fs::write(&path, report.content.as_bytes())
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            writeln!(out, "Wrote {} ({})", path.display(), report.file_name)?;
        }
        AdminCommand::Sports(command) => {
            let sports = usecases.manage_sports_catalog();
            match command {
                SportsCommand::List => {
                    for sport in sports.list().await? {
                        let state = if sport.is_active { "active" } else { "inactive" };
                        writeln!(out, "{}\t{}\t{}", sport.id, sport.name, state)?;
                    }
                }
                SportsCommand::Add { name, description } => {
                    let mut new_sport = NewSport::new(name);
                    if let Some(description) = description {
                        new_sport = new_sport.with_description(description);
                    }
                    let created = sports.create(new_sport).await?;
                    writeln!(out, "Created sport {} ({})", created.name, created.id)?;
                }
                SportsCommand::Remove { sport_id } => {
                    sports.delete(&SportId::from(sport_id.clone())).await?;
                    writeln!(out, "Removed sport {sport_id}")?;
                }
            }
        }
    }
    Ok(())
}

/// Requests are keyed by their own id; the CLI addresses them through the
/// institution they belong to.
async fn review(
    usecases: &UseCases,
    institution_id: InstitutionId,
    decision: SponsorshipDecision,
) -> Result<()> {
    let store = usecases.deps().admin_store.clone();
    usecases.load_admin_data().execute().await?;
    let request = store
        .latest_request_for(institution_id)
        .ok_or_else(|| anyhow!("No sponsorship request for institution {institution_id}"))?;
    usecases
        .review_sponsorship()
        .execute(request.id, decision)
        .await
}

fn print_lines<'a, W: Write>(out: &mut W, lines: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut any = false;
    for line in lines {
        writeln!(out, "{line}")?;
        any = true;
    }
    if !any {
        writeln!(out, "(none)")?;
    }
    Ok(())
}
