use genie_client::ApiClient;
use genie_core::prelude::*;
use gumdrop::Options as _;
use tokio::io::BufReader;

use crate::{
    args::{Args, Command, FeedbackArgs, FormArgs, GenerateArgs},
    session::{Session, Status},
    terminal::Terminal,
};

pub async fn run(args: Args) -> anyhow::Result<()> {
    let Args {
        api_url, command, ..
    } = args;

    let command = match command {
        Some(command) => command,
        None => {
            print_usage();
            return Ok(());
        }
    };

    match command {
        Command::Version(..) => {
            println!("{}", crate::version());
            Ok(())
        }
        Command::Constraints(..) => constraints(&connect(api_url.as_deref())?).await,
        Command::Generate(args) => generate(&connect(api_url.as_deref())?, args).await,
        Command::Form(args) => form(&connect(api_url.as_deref())?, args).await,
        Command::Feedback(args) => feedback(&connect(api_url.as_deref())?, args).await,
    }
}

fn print_usage() {
    eprintln!(
        "{}",
        indoc::formatdoc!(
            r#"
            Usage: genie [OPTIONS] COMMAND [ARGS]

            {usage}

            Available commands:
            {commands}
            "#,
            usage = Args::usage(),
            commands = Args::command_list().unwrap_or_default(),
        )
    );
}

fn connect(api_url: Option<&str>) -> anyhow::Result<ApiClient> {
    let mut config = ApiConfig::load_from_env()?;
    if let Some(api_url) = api_url {
        config = config.with_api_url(api_url)?;
    }

    log::debug!("using the api at {}", config.api_url);
    ApiClient::new(&config)
}

async fn constraints(client: &ApiClient) -> anyhow::Result<()> {
    let constraints = client.fetch_constraints().await?;
    println!("{}", serde_json::to_string_pretty(&*constraints)?);
    Ok(())
}

async fn generate(client: &ApiClient, args: GenerateArgs) -> anyhow::Result<()> {
    let constraints = match args.server_defaults {
        true => Some(client.fetch_constraints().await?),
        false => None,
    };

    let mut session = Session::default();
    args.apply(session.builder_mut(), constraints.as_deref());

    if let Some(constraints) = &constraints {
        let data_type = session.builder().data_type();
        if !constraints.supports_data_type(data_type) {
            log::warn!("the server does not advertise support for {data_type}");
        }
        let format = session.builder().output_format();
        if !constraints.supports_output_format(format) {
            log::warn!("the server does not advertise the {format} output format");
        }
    }

    if let Status::Failed(err) = session.submit(client).await {
        anyhow::bail!("cannot generate a test case: {err}")
    }

    if let Some(result) = session.result() {
        if result.is_empty() {
            log::warn!("the server returned an empty test case");
        }
        println!("{result}");
    }

    if args.wants_export() {
        let path = session.export(args.output.as_deref()).await?;
        log::info!("exported to {}", path.display());
    }
    Ok(())
}

async fn form(client: &ApiClient, args: FormArgs) -> anyhow::Result<()> {
    let mut session = Session::default();
    let mut terminal = Terminal::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());

    // the form still works without constraints, they only inform it
    match client.constraints().await {
        Ok(constraints) => {
            log::debug!(
                "server supports: {} as {}",
                constraints.data_types.join(", "),
                constraints.output_formats.join(", ")
            );
            if args.server_defaults {
                session.builder_mut().apply_constraints(&constraints);
                terminal = terminal.with_defaults(constraints);
            }
        }
        Err(err) => log::warn!("cannot fetch constraints: {err:#}"),
    }

    terminal.run(&mut session, client).await
}

async fn feedback(client: &ApiClient, args: FeedbackArgs) -> anyhow::Result<()> {
    let message = match args.message() {
        Some(message) => message,
        None => anyhow::bail!("feedback needs a message"),
    };

    let ack = client.submit_feedback(&message).await?;
    log::info!("{ack}");
    Ok(())
}
