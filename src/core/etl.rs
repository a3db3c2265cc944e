use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Extracts from every source, then saves. Returns the saved location.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting vacancy search...");

        let vacancies = self.pipeline.extract().await?;
        tracing::info!("Extracted {} vacancies", vacancies.len());

        let output_path = self.pipeline.load(vacancies).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
