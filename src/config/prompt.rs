use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;

pub const SYSTEM_PROMPT: &str = "You are L’Oréal Beauty Assistant, a helpful, concise expert on L’Oréal products (skincare, makeup, haircare, fragrance) and beauty routines.
- Only answer questions related to L’Oréal, beauty routines, product recommendations, ingredients, application tips, suitability by skin/hair type, and shopping or shade guidance.
- If a question is unrelated (e.g., homework, politics, unrelated tech, other brands), politely refuse and steer the user back to L’Oréal/beauty topics.
- Ask brief follow-up questions when needed for personalization (skin type, hair concerns, sensitivities, budget).
- Keep responses scannable with short paragraphs or bullet points when helpful.
- Never claim to be a medical professional; for medical concerns, suggest seeing a dermatologist.
- Keep brand tone: refined, friendly, empowering.";

pub const GREETING: &str =
    "Bonjour! I’m your L’Oréal Beauty Assistant. Ask me about products or routines and I’ll tailor recommendations.";

pub const FALLBACK_REPLY: &str = "Sorry—there was a problem reaching the AI. Please try again.";

#[derive(Debug)]
pub enum PromptError {
    EmptyField(&'static str),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyField(key) => write!(f, "Prompt field '{}' must not be empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Persona text for the conversation client. Fields missing from a prompts
/// file keep their built-in values.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub greeting: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            greeting: GREETING.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if self.system_prompt.trim().is_empty() {
            return Err(PromptError::EmptyField("system_prompt"));
        }
        if self.greeting.trim().is_empty() {
            return Err(PromptError::EmptyField("greeting"));
        }
        Ok(())
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<PromptConfig, PromptError> {
    let file_content = fs::read_to_string(path.as_ref())?;
    let config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    info!("Loaded prompts from {}", path.as_ref().display());
    Ok(config)
}

/// Built-in prompts unless a prompts file was given explicitly.
pub fn resolve_prompts(path: Option<&str>) -> Result<PromptConfig, PromptError> {
    match path {
        Some(p) => load_prompts(p),
        None => Ok(PromptConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("prompts-{}.json", Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_default_greeting() {
        let path = write_temp(r#"{"system_prompt": "Be brief."}"#);
        let config = load_prompts(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.system_prompt, "Be brief.");
        assert_eq!(config.greeting, GREETING);
    }

    #[test]
    fn blank_system_prompt_is_rejected() {
        let path = write_temp(r#"{"system_prompt": "  "}"#);
        let err = load_prompts(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, PromptError::EmptyField("system_prompt")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = resolve_prompts(Some("/nonexistent/prompts.json")).unwrap_err();
        assert!(matches!(err, PromptError::IoError(_)));
    }

    #[test]
    fn no_path_uses_builtin() {
        assert_eq!(resolve_prompts(None).unwrap(), PromptConfig::default());
    }
}
