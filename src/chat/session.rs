use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::config::ResolvedConfig;
use crate::conversation::Conversation;
use crate::router::Router;
use crate::translation::Language;
use crate::ui::{Spinner, Style, is_prompt_cancelled};

/// Whether the REPL keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One interactive chat session: the router, the message log and the
/// currently selected language.
pub struct ChatSession {
    config: ResolvedConfig,
    router: Router,
    conversation: Conversation,
    language: Language,
}

impl ChatSession {
    pub fn new(config: ResolvedConfig, router: Router) -> Self {
        let language = config.language;
        Self {
            config,
            router,
            conversation: Conversation::new(),
            language,
        }
    }

    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(self.language);
        ui::print_history(&self.conversation);

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightGreen)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: green
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkGreen));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Ask about crops, weather or market rates; /help for commands")
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if self.handle_command(cmd).await == Flow::Quit {
                            break;
                        }
                    }
                    Input::Text(text) => self.ask(&text).await,
                },
                Err(e) if is_prompt_cancelled(&e) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    /// Routes one message and prints the reply.
    pub async fn ask(&mut self, text: &str) {
        let reply = {
            let _spinner = Spinner::new("Thinking...");
            self.router
                .handle(&mut self.conversation, text, self.language)
                .await
        };

        ui::print_reply(&reply.text);
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> Flow {
        match cmd {
            SlashCommand::Clear => {
                self.conversation.clear();
                ui::print_success("Conversation cleared");
            }
            SlashCommand::Config => ui::print_config(&self.config, self.language),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::History => ui::print_history(&self.conversation),
            SlashCommand::Lang(value) => self.set_language(value.as_deref()),
            SlashCommand::Quit => return Flow::Quit,
            SlashCommand::Rate(product) => {
                let product = product.unwrap_or_else(|| self.router.defaults().product.clone());
                let rate = self.router.market_rate(&product).await;
                ui::print_reply(&rate);
            }
            SlashCommand::Weather(city) => {
                let city = city.unwrap_or_else(|| self.router.defaults().city.clone());
                let report = {
                    let _spinner = Spinner::new("Fetching weather...");
                    self.router.weather_report(&city).await
                };
                ui::print_reply(&report);
            }
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        Flow::Continue
    }

    fn set_language(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            println!(
                "Current language: {}\nUsage: /lang <marathi|hindi|english>\n",
                Style::value(self.language)
            );
            return;
        };

        match value.parse::<Language>() {
            Ok(language) => {
                self.language = language;
                ui::print_success(&format!("Language set to {}", Style::value(language)));
            }
            Err(e) => ui::print_error(&e.to_string()),
        }
    }
}
