// file: src/ocr/processor.rs
// description: turns documents on disk into markdown through the Mistral OCR endpoint
// reference: encodes input, calls the OCR client, and merges pages

use crate::config::Config;
use crate::error::{OcrError, Result};
use crate::models::{DocumentInput, OcrRequest, OcrResponse, ResponseInfo};
use crate::ocr::client::MistralOcrClient;
use crate::parser::{MarkdownParser, combine_ocr_pages_to_markdown};
use crate::utils::{
    DocumentMetrics, OperationTimer, PDF_MIME_TYPE, Validator, create_data_url,
    encode_bytes_to_base64, encode_pdf_to_base64, mime_type_for_path, read_document,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const SLOW_REQUEST: Duration = Duration::from_secs(60);

pub struct OcrProcessor {
    config: Config,
    client: MistralOcrClient,
    parser: MarkdownParser,
}

impl OcrProcessor {
    /// An explicit key wins over the configured one, which already includes `MISTRAL_API_KEY`.
    pub fn new(config: Config, api_key: Option<&str>) -> Result<Self> {
        let api_key = resolve_api_key(api_key, config.api.api_key.as_deref())?;
        let client = MistralOcrClient::new(api_key, &config.api)?;

        Ok(Self {
            config,
            client,
            parser: MarkdownParser::new(),
        })
    }

    pub async fn process_pdf(&self, pdf_path: &Path, include_images: bool) -> Result<String> {
        ensure_exists(pdf_path)?;

        self.run_pdf(pdf_path, include_images)
            .await
            .map_err(|e| OcrError::processing(pdf_path, e))
    }

    async fn run_pdf(&self, pdf_path: &Path, include_images: bool) -> Result<String> {
        let base64_pdf = encode_pdf_to_base64(pdf_path)?;
        let document = DocumentInput::document_url(create_data_url(&base64_pdf, PDF_MIME_TYPE));

        let response = self.call(pdf_path, document, include_images).await?;
        let markdown =
            combine_ocr_pages_to_markdown(&response, &self.config.output.page_separator);

        if include_images {
            let unresolved = self.parser.unresolved_images(&markdown);
            if !unresolved.is_empty() {
                warn!(
                    "{} image(s) in {} came back without data and were left as references",
                    unresolved.len(),
                    pdf_path.display()
                );
            }
        }

        Ok(markdown)
    }

    pub async fn process_image(&self, image_path: &Path) -> Result<String> {
        ensure_exists(image_path)?;
        Validator::validate_image_extension(image_path)?;

        self.run_image(image_path)
            .await
            .map_err(|e| OcrError::processing(image_path, e))
    }

    async fn run_image(&self, image_path: &Path) -> Result<String> {
        // validated above
        let mime = mime_type_for_path(image_path).unwrap_or("image/jpeg");
        let bytes = read_document(image_path)?;
        let document =
            DocumentInput::image_url(create_data_url(&encode_bytes_to_base64(&bytes), mime));

        let response = self.call(image_path, document, false).await?;
        Ok(combine_ocr_pages_to_markdown(
            &response,
            &self.config.output.page_separator,
        ))
    }

    pub async fn get_ocr_response_info(&self, pdf_path: &Path) -> Result<ResponseInfo> {
        ensure_exists(pdf_path)?;

        self.run_info(pdf_path)
            .await
            .map_err(|e| OcrError::processing(pdf_path, e))
    }

    async fn run_info(&self, pdf_path: &Path) -> Result<ResponseInfo> {
        let bytes = read_document(pdf_path)?;
        let document = DocumentInput::document_url(create_data_url(
            &encode_bytes_to_base64(&bytes),
            PDF_MIME_TYPE,
        ));
        let request = OcrRequest::new(self.config.api.model.clone(), document, true);

        let timer = OperationTimer::new(&format!("OCR {}", pdf_path.display()));
        let raw = self.client.process_raw(&request).await?;
        timer.finish();

        Ok(ResponseInfo::new(
            pdf_path.display().to_string(),
            &bytes,
            raw,
        ))
    }

    async fn call(
        &self,
        path: &Path,
        document: DocumentInput,
        include_images: bool,
    ) -> Result<OcrResponse> {
        let request = OcrRequest::new(self.config.api.model.clone(), document, include_images);

        info!("Sending {} to {}", path.display(), self.client.endpoint());
        let timer = OperationTimer::new(&format!("OCR {}", path.display()));
        let response = self.client.process(&request).await?;
        timer.warn_if_slow(SLOW_REQUEST);

        let metrics = DocumentMetrics::from_response(&response);
        debug!("OCR result for {}: {}", path.display(), metrics.format());
        timer.finish_with_pages(metrics.pages);

        Ok(response)
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(OcrError::FileNotFound(path.to_path_buf()));
    }
    Validator::validate_file_path(path)
}

pub fn resolve_api_key(explicit: Option<&str>, configured: Option<&str>) -> Result<String> {
    let present = |key: &&str| !key.trim().is_empty();
    let key = explicit
        .filter(present)
        .or(configured.filter(present))
        .ok_or(OcrError::MissingApiKey)?
        .trim();

    Validator::validate_api_key(key)?;
    Ok(key.to_string())
}
