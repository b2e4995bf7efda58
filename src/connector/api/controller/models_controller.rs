use anyhow::Result;

use crate::domain::ModelInfo;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let use_case = self.container.list_models_use_case();
        let models = use_case.execute().await?;
        Ok(format_model_list(&models))
    }
}

fn format_model_list(models: &[ModelInfo]) -> String {
    if models.is_empty() {
        return "No models available.".to_string();
    }

    let mut output = format!("Available models ({}):\n\n", models.len());
    for model in models {
        output.push_str(&format!("  {}", model.id));
        if let Some(owner) = &model.owned_by {
            output.push_str(&format!(" ({owner})"));
        }
        if !model.is_active() {
            output.push_str(" [inactive]");
        }
        output.push('\n');
        if let Some(window) = model.context_window {
            output.push_str(&format!("    Context window: {window} tokens\n"));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing() {
        assert_eq!(format_model_list(&[]), "No models available.");
    }

    #[test]
    fn lists_owner_and_context_window() {
        let mut model = ModelInfo::new("llama-3.2-1b-preview");
        model.owned_by = Some("Meta".into());
        model.context_window = Some(8192);
        let mut retired = ModelInfo::new("llama2-70b-4096");
        retired.active = Some(false);

        let output = format_model_list(&[model, retired]);

        assert!(output.starts_with("Available models (2):"));
        assert!(output.contains("  llama-3.2-1b-preview (Meta)\n"));
        assert!(output.contains("Context window: 8192 tokens"));
        assert!(output.contains("llama2-70b-4096 [inactive]"));
    }
}
