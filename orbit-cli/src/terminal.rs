//! Line-oriented terminal renderers.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use orbit_core::{
    validate_answer, Answer, AnswerCallback, Event, Notice, NoticeKind, Question,
    QuestionRenderer, QuestionType, ResultsRenderer, ResultsView,
};

/// Value submitted when a slider prompt is left empty.
pub const SLIDER_DEFAULT: f64 = 0.5;

/// Renders questions and results over any line-based reader and writer.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Ask a yes/no question. Anything but `y`/`yes` (or end of input) is no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let reply = self.prompt(&format!("{} [y/n] ", question))?;
        Ok(matches!(
            reply.as_deref().map(|r| r.trim().to_ascii_lowercase()),
            Some(r) if r == "y" || r == "yes"
        ))
    }

    /// Shown while a request is in flight; input is not read until it settles.
    pub fn show_waiting(&mut self) -> Result<()> {
        writeln!(self.output, "Loading...")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn show_notice(&mut self, notice: &Notice) -> Result<()> {
        let label = match notice.kind {
            NoticeKind::StartFailed => "Could not start the interview",
            NoticeKind::SubmitFailed => "Could not submit your answer",
            NoticeKind::InvalidAnswer => "Invalid answer",
            NoticeKind::ResultUnavailable => "Your results are not available yet",
        };
        writeln!(self.output, "! {}: {}", label, notice.message)?;
        Ok(())
    }

    /// Turn raw input into a candidate answer for `question`.
    fn parse_answer(question: &Question, raw: &str) -> Answer {
        let raw = raw.trim();
        match question.question_type {
            QuestionType::MultipleChoice => {
                // Accept either the option number or its text
                let picked = raw
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| question.choices().and_then(|c| c.get(i)));
                match picked {
                    Some(choice) => Answer::from(choice.as_str()),
                    None => Answer::from(raw),
                }
            }
            QuestionType::Likert => match raw.parse::<f64>() {
                Ok(value) => Answer::Number(value),
                Err(_) => Answer::from(raw),
            },
            QuestionType::Slider => {
                if raw.is_empty() {
                    return Answer::Number(SLIDER_DEFAULT);
                }
                match raw.parse::<f64>() {
                    Ok(value) => Answer::Number(value),
                    Err(_) => Answer::from(raw),
                }
            }
            QuestionType::FreeText => Answer::from(raw),
        }
    }

    fn write_question(&mut self, question: &Question) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", question.text)?;

        match question.question_type {
            QuestionType::MultipleChoice => {
                for (i, choice) in question.choices().unwrap_or_default().iter().enumerate() {
                    writeln!(self.output, "  {}) {}", i + 1, choice)?;
                }
            }
            QuestionType::Likert => {
                let scale: Vec<String> = question
                    .scale()
                    .unwrap_or_default()
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                writeln!(self.output, "  Scale: {}", scale.join(" / "))?;
            }
            QuestionType::Slider => {
                writeln!(
                    self.output,
                    "  Enter a value from 0 to 1 (empty for {})",
                    SLIDER_DEFAULT
                )?;
            }
            QuestionType::FreeText => {}
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> QuestionRenderer for Terminal<R, W> {
    fn render_question(&mut self, question: &Question, respond: AnswerCallback) -> Result<Event> {
        self.write_question(question)?;

        loop {
            let Some(raw) = self.prompt("> ")? else {
                bail!("input closed before question {} was answered", question.id);
            };

            let candidate = Self::parse_answer(question, &raw);
            match validate_answer(question, &candidate) {
                Ok(answer) => return Ok(respond.answer(answer)),
                Err(rejection) => writeln!(self.output, "  {}", rejection)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ResultsRenderer for Terminal<R, W> {
    fn render_results(&mut self, view: &ResultsView) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Your top matches")?;
        writeln!(self.output, "================")?;

        if view.recommendations.is_empty() {
            writeln!(self.output, "No recommendations were returned.")?;
        }
        for recommendation in &view.recommendations {
            writeln!(
                self.output,
                "{}. {} ({} fit)",
                recommendation.rank,
                recommendation.name,
                recommendation.fit_percent()
            )?;
            if !recommendation.explanation.is_empty() {
                writeln!(self.output, "   {}", recommendation.explanation)?;
            }
        }

        writeln!(self.output)?;
        writeln!(self.output, "Questions answered: {}", view.questions_answered)?;
        if let Some(reason) = &view.completion_reason {
            writeln!(self.output, "Interview ended: {}", reason)?;
        }
        Ok(())
    }
}
