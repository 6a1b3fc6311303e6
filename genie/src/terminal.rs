use std::path::Path;

use genie_core::prelude::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _, Lines};

use crate::session::{Session, Status};

const MENU: &str = "[g]enerate, [e]dit, e[x]port, [f]eedback, [q]uit > ";

/// A line oriented rendition of the generation form
pub struct Terminal<R, W> {
    lines: Lines<R>,
    out: W,
    defaults: Option<Arc<Constraints>>,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
            defaults: None,
        }
    }

    /// Seeds the server's defaults whenever the data type changes
    pub fn with_defaults(self, constraints: Arc<Constraints>) -> Self {
        Self {
            defaults: Some(constraints),
            ..self
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Fills in the form, then loops on the menu until quit or end of input
    pub async fn run<G>(&mut self, session: &mut Session, gateway: &G) -> anyhow::Result<()>
    where
        G: Gateway + ?Sized,
    {
        if !self.fill(session.builder_mut()).await? {
            return Ok(());
        }

        loop {
            let choice = match self.ask(MENU).await? {
                Some(choice) => choice,
                None => return Ok(()),
            };

            match &*choice.trim().to_ascii_lowercase() {
                "g" | "generate" => self.generate(session, gateway).await?,
                "e" | "edit" => {
                    if !self.fill(session.builder_mut()).await? {
                        return Ok(());
                    }
                }
                "x" | "export" => self.export(session).await?,
                "f" | "feedback" => self.feedback(gateway).await?,
                "q" | "quit" => return Ok(()),
                "" => continue,
                other => self.say(format!("unknown choice: '{other}'\n")).await?,
            }
        }
    }

    /// Prompts for every applicable field, returns false if the input ran out.
    ///
    /// The field list is re-evaluated after each answer, so changing the data
    /// type or element type changes what is asked next.
    pub async fn fill(&mut self, builder: &mut RequestBuilder) -> anyhow::Result<bool> {
        let mut index = 0;
        loop {
            let fields = builder.fields();
            let field = match fields.get(index) {
                Some(&field) => field,
                None => return Ok(true),
            };

            let line = match self.ask(&prompt_for(builder, field)).await? {
                Some(line) => line,
                None => return Ok(false),
            };

            if line.trim().is_empty() {
                index += 1;
                continue;
            }

            let input = match (field, line.trim()) {
                (Field::Charset, "-") => "",
                _ => &*line,
            };

            let data_type = builder.data_type();
            match builder.set(field, input) {
                Ok(()) => index += 1,
                Err(err) => {
                    self.say(format!("  {err}\n")).await?;
                    continue;
                }
            }

            if let Some(constraints) = &self.defaults {
                if builder.data_type() != data_type {
                    builder.apply_constraints(constraints);
                }
            }
        }
    }

    async fn generate<G>(&mut self, session: &mut Session, gateway: &G) -> anyhow::Result<()>
    where
        G: Gateway + ?Sized,
    {
        self.say("Generating...\n").await?;
        match session.submit(gateway).await.clone() {
            Status::Ready => {
                let result = session.result().map(ToString::to_string);
                self.say(format!("{}\n", result.unwrap_or_default())).await
            }
            Status::Failed(err) => {
                self.say(format!("Failed to generate a test case: {err}\n"))
                    .await
            }
            Status::Idle | Status::Pending => Ok(()),
        }
    }

    async fn export(&mut self, session: &Session) -> anyhow::Result<()> {
        let default = session.builder().output_format().file_name();
        let line = match self.ask(&format!("Export to [{default}]: ")).await? {
            Some(line) => line,
            None => return Ok(()),
        };

        let path = Some(line.trim())
            .filter(|s| !s.is_empty())
            .map(Path::new);

        match session.export(path).await {
            Ok(path) => self.say(format!("Exported to {}\n", path.display())).await,
            Err(err) => self.say(format!("{err}\n")).await,
        }
    }

    async fn feedback<G>(&mut self, gateway: &G) -> anyhow::Result<()>
    where
        G: Gateway + ?Sized,
    {
        let line = match self.ask("Feedback: ").await? {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Ok(()),
        };

        match gateway.feedback(line.trim()).await {
            Ok(ack) => log::debug!("feedback: {ack}"),
            Err(err) => log::warn!("cannot send feedback: {err:#}"),
        }
        self.say("Thanks for the feedback\n").await
    }

    async fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.say(prompt).await?;
        Ok(self.lines.next_line().await?)
    }

    async fn say(&mut self, data: impl AsRef<str> + Send) -> anyhow::Result<()> {
        self.out.write_all(data.as_ref().as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }
}

fn prompt_for(builder: &RequestBuilder, field: Field) -> String {
    let hint = match field.choices() {
        Some(choices) => format!(" ({choices})"),
        None if field.is_flag() => String::from(" (yes/no)"),
        None if field == Field::Charset => String::from(" (- for default)"),
        None => String::new(),
    };

    let current = builder.value(field);
    let current = if current.is_empty() {
        "default"
    } else {
        &*current
    };

    format!("{}{hint} [{current}]: ", field.label())
}
