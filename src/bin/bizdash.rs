use clap::{Parser, Subcommand};

use bizdash::metrics::TrendPoint;
use bizdash::{
    Company, Dashboard, Database, DemoSource, Domain, FinancialSummary, MembershipSummary,
    OperationalSummary, Period, Plan, PlatformSummary, RecordSource, Role,
    SalesMarketingSummary, User, Viewer, PLATFORM_COMPANY_ID,
};

/// Company and role used with `--demo` when none are given.
const DEMO_COMPANY: &str = "acme";
const DEMO_ROLE: Role = Role::CompanyAdmin;

#[derive(Parser)]
#[command(name = "bizdash", about = "Business metrics dashboards for small companies")]
struct Cli {
    /// Database path (default: ~/.bizdash/bizdash.db)
    #[arg(long)]
    db: Option<String>,

    /// Read from generated demo data instead of the database
    #[arg(long, global = true)]
    demo: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard statistics for a company
    Stats {
        /// Domain: financial, operations, sales-marketing, membership (default: all permitted)
        domain: Option<String>,
        /// Company to report on (default: config `company_id`)
        #[arg(long)]
        company: Option<String>,
        /// Viewer role (default: config `role`)
        #[arg(long)]
        role: Option<String>,
        /// Period (e.g. 2025, 2025-H1, 2025-Q3, 2025-07, 6m, ytd; default: all records)
        #[arg(long)]
        period: Option<String>,
        /// Also show the preceding period of the same length
        #[arg(long, requires = "period")]
        compare: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the cross-company platform overview
    Platform {
        /// Viewer role (default: config `role`)
        #[arg(long)]
        role: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append a JSON array of period records to the database
    Import {
        /// Domain: financial, operations, sales-marketing, membership
        domain: String,
        /// Path to the JSON file
        file: std::path::PathBuf,
    },
    /// Manage companies
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show database status
    Status,
}

#[derive(Subcommand)]
enum CompanyAction {
    /// Add a company, or update it if the id exists
    Add {
        id: String,
        name: String,
        /// URL slug (default: the id)
        #[arg(long)]
        slug: Option<String>,
        /// Subscription plan: free or paid
        #[arg(long, default_value = "free")]
        plan: String,
    },
    /// List companies
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Add a user
    Add {
        email: String,
        name: String,
        /// Role, e.g. ceo, finance-team, "Sales & Marketing"
        #[arg(long)]
        role: String,
        /// Company the user belongs to
        #[arg(long)]
        company: String,
        /// User id (default: the email)
        #[arg(long)]
        id: Option<String>,
    },
    /// List users
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
}

/// Fallbacks for flags the user left out.
#[derive(Default)]
struct Defaults {
    company: Option<String>,
    role: Option<String>,
}

impl Defaults {
    async fn load(db: &Database) -> anyhow::Result<Self> {
        Ok(Self {
            company: db.config_get("company_id").await?,
            role: db.config_get("role").await?,
        })
    }

    /// Demo viewers belong to the company they ask about.
    fn demo(company: Option<&str>) -> Self {
        Self {
            company: Some(company.unwrap_or(DEMO_COMPANY).to_string()),
            role: Some(DEMO_ROLE.key().to_string()),
        }
    }

    fn role(&self, flag: Option<String>) -> anyhow::Result<Role> {
        let role = flag.or_else(|| self.role.clone()).ok_or_else(|| {
            anyhow::anyhow!("No role given. Pass --role or run 'bizdash config set role <ROLE>'.")
        })?;
        Ok(Role::parse(&role)?)
    }

    fn company(&self, flag: Option<String>) -> anyhow::Result<String> {
        flag.or_else(|| self.company.clone()).ok_or_else(|| {
            anyhow::anyhow!(
                "No company given. Pass --company or run 'bizdash config set company_id <ID>'."
            )
        })
    }

    /// The viewer belongs to the configured company; without one, to the
    /// company being viewed. Platform admins always belong to the platform.
    fn viewer(&self, role: Role, target: &str) -> Viewer {
        let company = match role {
            Role::PlatformAdmin => PLATFORM_COMPANY_ID.to_string(),
            _ => self.company.clone().unwrap_or_else(|| target.to_string()),
        };
        Viewer::new(role, company)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.demo {
        let dash = Dashboard::new(DemoSource::new());
        return match cli.command {
            Commands::Stats {
                domain,
                company,
                role,
                period,
                compare,
                json,
            } => {
                let defaults = Defaults::demo(company.as_deref());
                let stats = StatsArgs::resolve(&defaults, domain, company, role, period)?;
                handle_stats(&dash, stats, compare, json).await
            }
            Commands::Platform { role, json } => {
                handle_platform(&dash, &Defaults::demo(None), role, json).await
            }
            _ => Err(anyhow::anyhow!(
                "--demo only supports the 'stats' and 'platform' commands"
            )),
        };
    }

    let db = match &cli.db {
        Some(path) => Database::open_at(path).await?,
        None => Database::open().await?,
    };

    match cli.command {
        Commands::Stats {
            domain,
            company,
            role,
            period,
            compare,
            json,
        } => {
            let defaults = Defaults::load(&db).await?;
            let stats = StatsArgs::resolve(&defaults, domain, company, role, period)?;
            handle_stats(&Dashboard::new(db), stats, compare, json).await?;
        }
        Commands::Platform { role, json } => {
            let defaults = Defaults::load(&db).await?;
            handle_platform(&Dashboard::new(db), &defaults, role, json).await?;
        }
        Commands::Import { domain, file } => {
            let domain = parse_domain(&domain)?;
            let json = std::fs::read_to_string(&file)?;
            let count = db.import_json(domain, &json).await?;
            println!("Imported {count} {domain} records from {}.", file.display());
        }
        Commands::Company { action } => {
            handle_company(&db, action).await?;
        }
        Commands::User { action } => {
            handle_user(&db, action).await?;
        }
        Commands::Config { action } => {
            handle_config(&db, action).await?;
        }
        Commands::Status => {
            print_status(&db).await?;
        }
    }

    Ok(())
}

fn parse_domain(s: &str) -> anyhow::Result<Domain> {
    Domain::parse(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown domain '{s}'. Expected one of: financial, operations, sales-marketing, membership"
        )
    })
}

struct StatsArgs {
    domains: Vec<Domain>,
    company: String,
    viewer: Viewer,
    period: Option<Period>,
}

impl StatsArgs {
    fn resolve(
        defaults: &Defaults,
        domain: Option<String>,
        company: Option<String>,
        role: Option<String>,
        period: Option<String>,
    ) -> anyhow::Result<Self> {
        let role = defaults.role(role)?;
        let company = defaults.company(company)?;
        let viewer = defaults.viewer(role, &company);
        let domains = match domain {
            Some(d) => vec![parse_domain(&d)?],
            None => Domain::ALL.to_vec(),
        };
        let period = period.as_deref().map(Period::parse).transpose()?;
        Ok(Self {
            domains,
            company,
            viewer,
            period,
        })
    }
}

/// One domain's summary, kept together for printing and JSON output.
#[derive(Debug)]
enum Summary {
    Financial(FinancialSummary),
    Operations(OperationalSummary),
    SalesMarketing(SalesMarketingSummary),
    Membership(MembershipSummary),
}

impl Summary {
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Summary::Financial(s) => serde_json::to_value(s),
            Summary::Operations(s) => serde_json::to_value(s),
            Summary::SalesMarketing(s) => serde_json::to_value(s),
            Summary::Membership(s) => serde_json::to_value(s),
        }
    }

    fn print(&self) {
        match self {
            Summary::Financial(s) => print_financial(s),
            Summary::Operations(s) => print_operations(s),
            Summary::SalesMarketing(s) => print_sales_marketing(s),
            Summary::Membership(s) => print_membership(s),
        }
    }
}

async fn load_summary<S: RecordSource>(
    dash: &Dashboard<S>,
    domain: Domain,
    viewer: &Viewer,
    company: &str,
    period: Option<&Period>,
) -> bizdash::Result<Summary> {
    Ok(match domain {
        Domain::Financial => Summary::Financial(dash.financial(viewer, company, period).await?),
        Domain::Operations => {
            Summary::Operations(dash.operations(viewer, company, period).await?)
        }
        Domain::SalesMarketing => {
            Summary::SalesMarketing(dash.sales_marketing(viewer, company, period).await?)
        }
        Domain::Membership => Summary::Membership(dash.membership(viewer, company, period).await?),
    })
}

/// Load every requested domain the viewer may see, with the summary for
/// `previous` alongside when comparing.
///
/// Without an explicit domain, pages the role cannot open are skipped; if
/// that leaves nothing, the last denial is returned.
async fn collect_stats<S: RecordSource>(
    dash: &Dashboard<S>,
    args: &StatsArgs,
    previous: Option<&Period>,
) -> bizdash::Result<Vec<(Domain, Summary, Option<Summary>)>> {
    let explicit = args.domains.len() == 1;
    let mut shown = Vec::new();
    let mut denied = None;

    for &domain in &args.domains {
        let current =
            match load_summary(dash, domain, &args.viewer, &args.company, args.period.as_ref())
                .await
            {
                Ok(s) => s,
                Err(e @ bizdash::Error::AccessDenied { .. }) if !explicit => {
                    log::info!("skipping {domain}: not visible to {}", args.viewer.role);
                    denied = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };
        let prior = match previous {
            Some(p) => {
                Some(load_summary(dash, domain, &args.viewer, &args.company, Some(p)).await?)
            }
            None => None,
        };
        shown.push((domain, current, prior));
    }

    match denied {
        Some(e) if shown.is_empty() => Err(e),
        _ => Ok(shown),
    }
}

async fn handle_stats<S: RecordSource>(
    dash: &Dashboard<S>,
    args: StatsArgs,
    compare: bool,
    json: bool,
) -> anyhow::Result<()> {
    let previous = if compare {
        args.period.as_ref().map(Period::previous)
    } else {
        None
    };
    let shown = collect_stats(dash, &args, previous.as_ref()).await?;

    if json {
        let mut output = serde_json::Map::new();
        for (domain, current, prior) in &shown {
            let value = match prior {
                Some(prior) => serde_json::json!({
                    "current": current.to_json()?,
                    "previous": prior.to_json()?,
                }),
                None => current.to_json()?,
            };
            output.insert(domain.to_string(), value);
        }
        let value = if args.domains.len() == 1 {
            output.into_iter().next().map(|(_, v)| v).unwrap_or_default()
        } else {
            serde_json::Value::Object(output)
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let window = args
        .period
        .as_ref()
        .map_or_else(|| "all periods".to_string(), Period::to_key);
    for (domain, current, prior) in &shown {
        println!("{} ({window})", domain_title(*domain, &args.company));
        current.print();
        if let (Some(prior), Some(p)) = (prior, &previous) {
            println!("  Previous period ({}):", p.to_key());
            prior.print();
        }
        println!();
    }
    Ok(())
}

fn domain_title(domain: Domain, company: &str) -> String {
    let name = match domain {
        Domain::Financial => "Financial",
        Domain::Operations => "Operations",
        Domain::SalesMarketing => "Sales & Marketing",
        Domain::Membership => "Membership",
    };
    format!("{name}: {company}")
}

async fn handle_platform<S: RecordSource>(
    dash: &Dashboard<S>,
    defaults: &Defaults,
    role: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let role = defaults.role(role)?;
    let viewer = defaults.viewer(role, PLATFORM_COMPANY_ID);
    let summary = dash.platform(&viewer).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_platform(&summary);
    }
    Ok(())
}

async fn handle_company(db: &Database, action: CompanyAction) -> anyhow::Result<()> {
    match action {
        CompanyAction::Add {
            id,
            name,
            slug,
            plan,
        } => {
            let company = Company {
                slug: slug.unwrap_or_else(|| id.clone()),
                plan: Plan::parse(&plan)?,
                id,
                name,
            };
            println!("{}", save_company(db, company).await?);
        }
        CompanyAction::List { json } => {
            let companies = db.companies().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&companies)?);
            } else if companies.is_empty() {
                println!("No companies.");
            } else {
                for c in &companies {
                    println!("  {:<16} {:<6} {}", c.id, c.plan.as_str(), c.name);
                }
            }
        }
    }
    Ok(())
}

/// Insert or update a company and describe what happened.
async fn save_company(db: &Database, company: Company) -> bizdash::Result<String> {
    let verb = match db.company(&company.id).await? {
        Some(_) => "Updated",
        None => "Added",
    };
    let message = format!("{verb} company {} ({}).", company.id, company.plan.as_str());
    db.upsert_company(company).await?;
    Ok(message)
}

async fn save_user(db: &Database, user: User) -> bizdash::Result<String> {
    let message = format!("Added {} as {} of {}.", user.email, user.role, user.company_id);
    db.add_user(user).await?;
    Ok(message)
}

async fn handle_user(db: &Database, action: UserAction) -> anyhow::Result<()> {
    match action {
        UserAction::Add {
            email,
            name,
            role,
            company,
            id,
        } => {
            let user = User {
                id: id.unwrap_or_else(|| email.clone()),
                email,
                name,
                role: Role::parse(&role)?,
                company_id: company,
            };
            println!("{}", save_user(db, user).await?);
        }
        UserAction::List { json } => {
            let users = db.users().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                println!("No users.");
            } else {
                for u in &users {
                    println!(
                        "  {:<16} {:<18} {} <{}>",
                        u.company_id, u.role, u.name, u.email
                    );
                }
            }
        }
    }
    Ok(())
}

async fn handle_config(db: &Database, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => match db.config_get(&key).await? {
            Some(v) => println!("{key} = {v}"),
            None => println!("{key} is not set"),
        },
        ConfigAction::Set { key, value } => {
            if key == "role" {
                Role::parse(&value)?;
            }
            db.config_set(&key, &value).await?;
            println!("Config updated.");
        }
        ConfigAction::List => {
            let items = db.config_list().await?;
            if items.is_empty() {
                println!("No config values set.");
            } else {
                for (key, value) in &items {
                    println!("{key} = {value}");
                }
            }
        }
    }
    Ok(())
}

async fn print_status(db: &Database) -> anyhow::Result<()> {
    let companies = db.companies().await?;
    let users = db.users().await?;
    let counts = db.record_counts().await?;

    println!("Database Status");
    println!("  Companies: {}", companies.len());
    println!("  Users:     {}", users.len());
    println!("  Records:");
    for (domain, count) in counts {
        println!("    {:<16} {count}", domain.as_str());
    }
    Ok(())
}

fn print_trend(title: &str, trend: &[TrendPoint], unit: &str) {
    if trend.is_empty() {
        return;
    }
    println!("  {title}:");
    for point in trend {
        println!("    {} {}  {:.1}{unit}", point.period, point.label, point.value);
    }
}

fn print_financial(s: &FinancialSummary) {
    println!("  Revenue:        {:.2}", s.total_revenue);
    println!("  COGS:           {:.2}", s.total_cost_of_goods_sold);
    println!("  Expenses:       {:.2}", s.total_expenses);
    println!("  Net profit:     {:.2}", s.net_profit);
    println!("  Profit margin:  {:.1}%", s.profit_margin);
    println!("  Gross margin:   {:.1}%", s.gross_margin);
    println!("  Net cash flow:  {:.2}", s.net_cash_flow);
    println!("  Receivables:    {:.2}", s.accounts_receivable);
    println!("  Payables:       {:.2}", s.accounts_payable);
    println!("  Current ratio:  {:.2}", s.current_ratio);
    println!("  Revenue growth: {:.1}%", s.revenue_growth);
    println!("  Periods:        {}", s.period_count);
    if !s.trend.is_empty() {
        println!("  Trend:");
        for p in &s.trend {
            println!(
                "    {} {}  revenue {:.2}  expenses {:.2}  profit {:.2}",
                p.period, p.label, p.revenue, p.expenses, p.profit
            );
        }
    }
}

fn print_operations(s: &OperationalSummary) {
    println!("  Utilization:       {:.1}%", s.utilization_rate);
    println!("  Completion (last): {:.1}%", s.project_completion_rate);
    println!("  Completion (all):  {:.1}%", s.overall_completion_rate);
    println!(
        "  Projects:          {} of {} completed",
        s.projects_completed, s.projects_total
    );
    println!(
        "  Resource hours:    {:.0} of {:.0}",
        s.resource_hours_used, s.resource_hours_available
    );
    println!("  Cost per project:  {:.2}", s.cost_per_completed_project);
    println!("  Revenue per hour:  {:.2}", s.revenue_per_resource_hour);
    println!("  Periods:           {}", s.period_count);
    print_trend("Completion trend", &s.completion_trend, "%");
    print_trend("Utilization trend", &s.utilization_trend, "%");
}

fn print_sales_marketing(s: &SalesMarketingSummary) {
    println!("  Leads:             {}", s.lead_generation);
    println!("  Conversion:        {:.1}%", s.conversion_rate);
    println!("  Deals closed:      {:.0}", s.deals_closed);
    println!("  Pipeline value:    {:.2}", s.sales_pipeline_value);
    println!("  Revenue / client:  {:.2}", s.avg_revenue_per_client);
    println!("  Marketing ROI:     {:.2}x", s.marketing_roi);
    println!("  Cost per lead:     {:.2}", s.cost_per_lead);
    println!("  Marketing spend:   {:.2}", s.total_marketing_spend);
    println!("  Periods:           {}", s.period_count);
    if !s.lead_trend.is_empty() {
        println!("  Lead trend:");
        for p in &s.lead_trend {
            println!(
                "    {} {}  {} leads  {:.1}% converted",
                p.period, p.label, p.leads, p.conversion_rate
            );
        }
    }
}

fn print_membership(s: &MembershipSummary) {
    println!("  Members:     {}", s.total_members);
    println!("  Joined:      {}", s.new_members);
    println!("  Lost:        {}", s.members_lost);
    println!("  Net growth:  {}", s.net_member_growth);
    println!("  Retention:   {:.1}%", s.retention_rate);
    println!("  Churn:       {:.1}%", s.churn_rate);
    println!("  CSAT:        {:.1}", s.csat);
    println!("  NPS:         {:.0}", s.nps);
    println!("  Periods:     {}", s.period_count);
    if !s.trend.is_empty() {
        println!("  Trend:");
        for p in &s.trend {
            println!(
                "    {} {}  {} members  +{} / -{}",
                p.period, p.label, p.total_members, p.new_members, p.members_lost
            );
        }
    }
}

fn print_platform(s: &PlatformSummary) {
    println!("Platform Overview");
    println!("  Companies:     {}", s.total_companies);
    println!("  Users:         {}", s.total_users);
    println!("  Subscriptions: {}", s.active_subscriptions);
    println!("    Paid: {}", s.subscriptions.paid);
    println!("    Free: {}", s.subscriptions.free);
}
