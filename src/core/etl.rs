use crate::core::Pipeline;
use crate::domain::model::ScanReport;
use crate::utils::error::Result;
use tracing::Instrument;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ScanReport> {
        tracing::info!("Starting drug code scan");

        // Extract
        let inputs = self
            .pipeline
            .extract()
            .instrument(tracing::info_span!("extract"))
            .await?;
        tracing::info!("Extracted {} payloads", inputs.len());

        // Transform
        let transformed = self
            .pipeline
            .transform(inputs)
            .instrument(tracing::info_span!("transform"))
            .await?;
        let summary = transformed.summary;
        tracing::info!("Parsed {} payloads", transformed.processed_records.len());

        // Load
        let output_path = self
            .pipeline
            .load(transformed)
            .instrument(tracing::info_span!("load"))
            .await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(ScanReport {
            output_path,
            summary,
        })
    }
}
