//! Selector-based extraction over HTML result pages

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SkillError};
use crate::types::Record;

/// Extracts one record per element matching a container selector
///
/// Sub-selectors are evaluated inside each container. A missing title or
/// link sub-selector means the container element itself carries it.
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    container: Selector,
    title: Option<Selector>,
    link: Option<Selector>,
    description: Option<Selector>,
    href_prefix: Option<String>,
    truncate_at: Option<char>,
    base_url: Option<Url>,
}

impl SelectorStrategy {
    /// Create a strategy matching records with `container`
    ///
    /// # Errors
    /// Returns `ParseError` if the selector is invalid
    pub fn new(container: &str) -> Result<Self> {
        Ok(Self {
            container: parse_selector(container)?,
            title: None,
            link: None,
            description: None,
            href_prefix: None,
            truncate_at: None,
            base_url: None,
        })
    }

    /// Selector for the element whose text is the record title
    pub fn title(mut self, selector: &str) -> Result<Self> {
        self.title = Some(parse_selector(selector)?);
        Ok(self)
    }

    /// Selector for the element whose `href` is the record URL
    pub fn link(mut self, selector: &str) -> Result<Self> {
        self.link = Some(parse_selector(selector)?);
        Ok(self)
    }

    /// Selector for the optional description text
    pub fn description(mut self, selector: &str) -> Result<Self> {
        self.description = Some(parse_selector(selector)?);
        Ok(self)
    }

    /// Skip containers whose raw `href` does not start with `prefix`
    pub fn require_href_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.href_prefix = Some(prefix.into());
        self
    }

    /// Drop everything from the first `delimiter` in the `href` onwards
    pub fn truncate_href_at(mut self, delimiter: char) -> Self {
        self.truncate_at = Some(delimiter);
        self
    }

    /// Resolve relative `href`s against `base`
    ///
    /// # Errors
    /// Returns `InvalidUrl` if `base` is not an absolute URL
    pub fn resolve_against(mut self, base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|_| SkillError::InvalidUrl(base.to_string()))?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Extract records in document order
    ///
    /// Containers without a title or link are skipped; an empty vector is
    /// returned when nothing matches.
    pub fn extract(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);

        document
            .select(&self.container)
            .filter_map(|element| self.extract_record(element))
            .collect()
    }

    fn extract_record(&self, element: ElementRef) -> Option<Record> {
        let title_element = match &self.title {
            Some(selector) => element.select(selector).next()?,
            None => element,
        };
        let title = element_text(title_element);
        if title.is_empty() {
            return None;
        }

        let link_element = match &self.link {
            Some(selector) => element.select(selector).next()?,
            None => element,
        };
        let href = link_element.value().attr("href")?.trim();
        if href.is_empty() {
            return None;
        }
        if let Some(prefix) = &self.href_prefix
            && !href.starts_with(prefix.as_str())
        {
            return None;
        }

        let href = match self.truncate_at {
            Some(delimiter) => href.split(delimiter).next().unwrap_or(href),
            None => href,
        };
        let url = match &self.base_url {
            Some(base) => base.join(href).ok()?.to_string(),
            None => href.to_string(),
        };

        let description = self
            .description
            .as_ref()
            .and_then(|selector| element.select(selector).next())
            .map(element_text)
            .unwrap_or_default();

        Some(Record::new(title, url).with_description(description))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| SkillError::ParseError(format!("Invalid selector {:?}: {:?}", selector, e)))
}

/// Collapsed, trimmed text content of an element
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
