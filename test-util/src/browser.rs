//! A minimal scripted browser for driving the server in integration tests.
//!
//! [`Browser`] keeps one "tab": it loads pages with a blocking `reqwest`
//! client, follows the `303` redirects the server answers form posts with,
//! and exposes the loaded document as a [`Page`] that can be queried with CSS
//! selectors. Restarting the browser drops the client, which stands in for a
//! user closing their browser and coming back later.

use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::wait::{WaitPolicy, retry_until};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures raised while loading or querying pages.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The HTTP request failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// A URL could not be resolved.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    /// A query was made before any page was loaded.
    #[error("no page has been loaded")]
    NoPage,
    /// A CSS selector did not parse.
    #[error("invalid selector {selector:?}: {reason}")]
    Selector {
        /// The offending selector.
        selector: String,
        /// Parser message.
        reason: String,
    },
    /// No element matched the selector.
    #[error("no element matches {0:?}")]
    ElementMissing(String),
}

/// Failure of [`Browser::wait_for_row_in_list_table`].
#[derive(Debug, Error)]
pub enum RowLookupError {
    /// The table was present but never contained the row.
    #[error("row {expected:?} not found in list table; rows were {rows:?}")]
    Missing {
        /// Row text that was waited for.
        expected: String,
        /// Rows seen on the last attempt.
        rows: Vec<String>,
    },
    /// The page could not be loaded or did not contain the table.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

fn selector(css: &str) -> Result<Selector, BrowserError> {
    Selector::parse(css).map_err(|err| BrowserError::Selector {
        selector: css.to_owned(),
        reason: err.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A loaded document together with the URL it was served from.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    status: u16,
    body: String,
}

impl Page {
    /// Wrap a response body.
    #[must_use]
    pub const fn new(url: Url, status: u16, body: String) -> Self { Self { url, status, body } }

    /// Final URL after redirects.
    #[must_use]
    pub const fn url(&self) -> &Url { &self.url }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> u16 { self.status }

    fn document(&self) -> Html { Html::parse_document(&self.body) }

    /// Whitespace-normalised text of the first element matching `css`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Selector`] if `css` does not parse.
    pub fn text_of(&self, css: &str) -> Result<Option<String>, BrowserError> {
        let sel = selector(css)?;
        Ok(self.document().select(&sel).next().map(element_text))
    }

    /// Attribute `name` of the first element matching `css`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ElementMissing`] if nothing matches.
    pub fn attribute(&self, css: &str, name: &str) -> Result<Option<String>, BrowserError> {
        let sel = selector(css)?;
        let document = self.document();
        let element = document
            .select(&sel)
            .next()
            .ok_or_else(|| BrowserError::ElementMissing(css.to_owned()))?;
        Ok(element.value().attr(name).map(str::to_owned))
    }

    /// Document title.
    ///
    /// # Errors
    ///
    /// Propagates selector failures.
    pub fn title(&self) -> Result<Option<String>, BrowserError> { self.text_of("title") }

    /// Text of the page heading.
    ///
    /// # Errors
    ///
    /// Propagates selector failures.
    pub fn header_text(&self) -> Result<Option<String>, BrowserError> { self.text_of("h1") }

    /// Validation message shown on the page, if any.
    ///
    /// # Errors
    ///
    /// Propagates selector failures.
    pub fn error_text(&self) -> Result<Option<String>, BrowserError> { self.text_of("#id_error") }

    /// Visible text of the whole body.
    ///
    /// # Errors
    ///
    /// Propagates selector failures.
    pub fn body_text(&self) -> Result<String, BrowserError> {
        Ok(self.text_of("body")?.unwrap_or_default())
    }

    /// Text of each row in `#id_list_table`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ElementMissing`] when the page has no list
    /// table.
    pub fn list_table_rows(&self) -> Result<Vec<String>, BrowserError> {
        let table_sel = selector("#id_list_table")?;
        let row_sel = selector("tr")?;
        let document = self.document();
        let table = document
            .select(&table_sel)
            .next()
            .ok_or_else(|| BrowserError::ElementMissing("#id_list_table".to_owned()))?;
        Ok(table.select(&row_sel).map(element_text).collect())
    }

    /// Absolute URL the form holding `#id_new_item` submits to.
    ///
    /// A form without an `action` posts back to the page's own URL.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ElementMissing`] when no form contains the
    /// input box.
    pub fn new_item_form_action(&self) -> Result<Url, BrowserError> {
        let form_sel = selector("form")?;
        let input_sel = selector("#id_new_item")?;
        let document = self.document();
        let form = document
            .select(&form_sel)
            .find(|form| form.select(&input_sel).next().is_some())
            .ok_or_else(|| BrowserError::ElementMissing("form #id_new_item".to_owned()))?;
        match form.value().attr("action") {
            Some(action) if !action.is_empty() => Ok(self.url.join(action)?),
            _ => Ok(self.url.clone()),
        }
    }
}

/// Blocking HTTP client that remembers the current page.
#[derive(Debug)]
pub struct Browser {
    base: Url,
    client: Client,
    page: Option<Page>,
}

impl Browser {
    /// Open a browser pointed at `base`. No page is loaded yet.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Http`] if the client cannot be built.
    pub fn new(base: Url) -> Result<Self, BrowserError> {
        Ok(Self {
            base,
            client: new_client()?,
            page: None,
        })
    }

    /// The currently loaded page.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NoPage`] before the first navigation.
    pub fn page(&self) -> Result<&Page, BrowserError> { self.page.as_ref().ok_or(BrowserError::NoPage) }

    /// Navigate to `path`, resolved against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError`] if the URL is invalid or the request fails.
    pub fn visit(&mut self, path: &str) -> Result<&Page, BrowserError> {
        let url = self.base.join(path)?;
        self.load(url)
    }

    /// Load the current URL again.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NoPage`] before the first navigation.
    pub fn refresh(&mut self) -> Result<&Page, BrowserError> {
        let url = self.page()?.url().clone();
        self.load(url)
    }

    /// Type `text` into `#id_new_item` and press Enter.
    ///
    /// The text is posted as `item_text` to the action of the form holding
    /// the input box; the resulting page (after any redirect) becomes
    /// current.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError`] if the page has no such form or the request
    /// fails.
    pub fn submit_new_item(&mut self, text: &str) -> Result<&Page, BrowserError> {
        let action = self.page()?.new_item_form_action()?;
        debug!(%action, text, "submitting new item");
        let response = self
            .client
            .post(action)
            .form(&[("item_text", text)])
            .send()?;
        self.store(response)
    }

    /// Close the browser and open a fresh one with no history.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Http`] if the new client cannot be built.
    pub fn restart(&mut self) -> Result<(), BrowserError> {
        self.client = new_client()?;
        self.page = None;
        Ok(())
    }

    /// Wait until `#id_list_table` contains a row whose text is exactly
    /// `expected`, reloading the page between attempts.
    ///
    /// # Errors
    ///
    /// Returns [`RowLookupError::Missing`] with the rows seen on the last
    /// attempt once `policy.max_wait` passes.
    pub fn wait_for_row_in_list_table(
        &mut self,
        expected: &str,
        policy: WaitPolicy,
    ) -> Result<(), RowLookupError> {
        let mut first = true;
        retry_until(policy, || {
            if !first {
                self.refresh()?;
            }
            first = false;
            let rows = self.page()?.list_table_rows()?;
            if rows.iter().any(|row| row == expected) {
                Ok(())
            } else {
                Err(RowLookupError::Missing {
                    expected: expected.to_owned(),
                    rows,
                })
            }
        })
    }

    fn load(&mut self, url: Url) -> Result<&Page, BrowserError> {
        debug!(%url, "loading page");
        let response = self.client.get(url).send()?;
        self.store(response)
    }

    fn store(&mut self, response: reqwest::blocking::Response) -> Result<&Page, BrowserError> {
        let url = response.url().clone();
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(self.page.insert(Page::new(url, status, body)))
    }
}

fn new_client() -> Result<Client, BrowserError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const LIST_PAGE: &str = r#"<!doctype html>
<html><head><title>To-Do lists</title></head>
<body>
  <h1>Your To-Do list</h1>
  <form method="POST" action="/lists/4/add_item">
    <input name="item_text" id="id_new_item" placeholder="Enter a to-do item">
    <div id="id_error">You can't have an empty list item</div>
  </form>
  <table id="id_list_table">
    <tr><td>1: Buy a Burger</td></tr>
    <tr><td>2: Use   Burger's ketchup</td></tr>
  </table>
</body></html>"#;

    #[fixture]
    fn list_page() -> Page {
        let url = Url::parse("http://127.0.0.1:8000/lists/4/").expect("url");
        Page::new(url, 200, LIST_PAGE.to_owned())
    }

    #[rstest]
    fn reads_title_and_heading(list_page: Page) {
        assert_eq!(list_page.title().expect("title").as_deref(), Some("To-Do lists"));
        assert_eq!(
            list_page.header_text().expect("h1").as_deref(),
            Some("Your To-Do list")
        );
    }

    #[rstest]
    fn reads_rows_with_normalised_whitespace(list_page: Page) {
        assert_eq!(
            list_page.list_table_rows().expect("rows"),
            ["1: Buy a Burger", "2: Use Burger's ketchup"]
        );
    }

    #[rstest]
    fn reads_input_attributes(list_page: Page) {
        assert_eq!(
            list_page
                .attribute("#id_new_item", "placeholder")
                .expect("attribute")
                .as_deref(),
            Some("Enter a to-do item")
        );
        assert!(matches!(
            list_page.attribute("#nope", "placeholder"),
            Err(BrowserError::ElementMissing(_))
        ));
    }

    #[rstest]
    fn resolves_form_action_against_page_url(list_page: Page) {
        assert_eq!(
            list_page.new_item_form_action().expect("action").as_str(),
            "http://127.0.0.1:8000/lists/4/add_item"
        );
    }

    #[rstest]
    fn reads_error_text(list_page: Page) {
        assert_eq!(
            list_page.error_text().expect("error").as_deref(),
            Some("You can't have an empty list item")
        );
    }

    #[rstest]
    fn missing_table_is_reported() {
        let url = Url::parse("http://127.0.0.1:8000/").expect("url");
        let page = Page::new(url, 200, "<html><body><h1>Start</h1></body></html>".to_owned());
        assert!(matches!(
            page.list_table_rows(),
            Err(BrowserError::ElementMissing(_))
        ));
    }

    #[rstest]
    fn queries_need_a_loaded_page() {
        let browser = Browser::new(Url::parse("http://127.0.0.1:1/").expect("url")).expect("browser");
        assert!(matches!(browser.page(), Err(BrowserError::NoPage)));
    }
}
