//! Page Rendering
//!
//! Renderers are a capability: they turn a page model into a file. The
//! orchestrator decides which pages exist and in what order, and only ever
//! talks to the [`PageRender`] trait.
//!
//! A series list renders as one index page followed by one detail page per
//! public series, in list order. Other series stay on the index without a
//! page of their own.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::access::{AccessLevel, VisibilityPredicate};
use crate::hashing::canonical_json;
use crate::message::Message;
use crate::naming::{detail_page_names, series_file_name};
use crate::series::Series;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write page {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    SeriesIndex,
    Series,
}

impl PageKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            PageKind::SeriesIndex => "series-index",
            PageKind::Series => "series",
        }
    }
}

/// Data handed to a renderer for one page.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageModel<'a> {
    SeriesIndex {
        title: Option<&'a str>,
        #[serde(rename = "seriesList")]
        series_list: &'a [Series],
    },
    Series {
        series: &'a Series,
        /// Already filtered by visibility, in track order.
        messages: Vec<&'a Message>,
    },
}

impl PageModel<'_> {
    pub fn kind(&self) -> PageKind {
        match self {
            PageModel::SeriesIndex { .. } => PageKind::SeriesIndex,
            PageModel::Series { .. } => PageKind::Series,
        }
    }
}

/// Render capability - one model in, one file out.
pub trait PageRender {
    /// Extension of the files this renderer produces, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, model: &PageModel<'_>, destination: &Path) -> Result<(), RenderError>;
}

/// Create `destination`, hand a buffered writer to `write`, and flush.
///
/// The file is closed when this returns, on success or failure.
pub fn write_page(
    destination: &Path,
    write: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io { path: destination.to_path_buf(), source };

    let file = File::create(destination).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(io_error)?;
    out.flush().map_err(io_error)?;
    Ok(())
}

/// Writes each model as canonical JSON (sorted keys).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPageRender;

impl PageRender for JsonPageRender {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, model: &PageModel<'_>, destination: &Path) -> Result<(), RenderError> {
        let body = canonical_json(model)?;
        write_page(destination, |out| {
            out.write_all(body.as_bytes())?;
            out.write_all(b"\n")
        })
    }
}

/// Only the most public series get their own detail page.
pub fn has_detail_page(series: &Series) -> bool {
    series.visibility() == Some(AccessLevel::MOST_PUBLIC)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedPage {
    pub kind: PageKind,
    pub path: PathBuf,
    pub title: Option<String>,
}

/// Renders a series index and the detail pages it links to.
pub struct SeriesIndexRender<'a> {
    series_list: &'a [Series],
    index_title: Option<String>,
}

impl<'a> SeriesIndexRender<'a> {
    pub fn new(series_list: &'a [Series]) -> Self {
        Self { series_list, index_title: None }
    }

    pub fn with_index_title(mut self, title: impl Into<String>) -> Self {
        self.index_title = Some(title.into());
        self
    }

    pub fn index_title(&self) -> Option<&str> {
        self.index_title.as_deref()
    }

    /// Write the index to `index_file`, then every public series' page next to it.
    ///
    /// Stops at the first page that fails. Returns the pages written, in order.
    pub fn render(
        &self,
        renderer: &dyn PageRender,
        visibility: &dyn VisibilityPredicate,
        index_file: &Path,
    ) -> Result<Vec<RenderedPage>, RenderError> {
        info!(file = %index_file.display(), "writing series index");
        let index = PageModel::SeriesIndex {
            title: self.index_title.as_deref(),
            series_list: self.series_list,
        };
        renderer.render(&index, index_file)?;

        let mut pages = vec![RenderedPage {
            kind: PageKind::SeriesIndex,
            path: index_file.to_path_buf(),
            title: self.index_title.clone(),
        }];

        let page_dir = index_file.parent().unwrap_or_else(|| Path::new(""));
        let names = detail_page_names(self.series_list, renderer.extension());
        for (series, name) in self.series_list.iter().zip(names) {
            let title = series.title().unwrap_or("(untitled)");
            let Some(name) = name else {
                info!(series = title, "skipping non-public series");
                continue;
            };
            if name != series_file_name(series, renderer.extension()) {
                warn!(series = title, file = %name, "page name already taken, using suffix");
            }

            let path = page_dir.join(name);
            info!(series = title, file = %path.display(), "writing series page");
            let model = PageModel::Series {
                series,
                messages: series.messages(visibility).unwrap_or_default(),
            };
            renderer.render(&model, &path)?;

            pages.push(RenderedPage {
                kind: PageKind::Series,
                path,
                title: series.title().map(str::to_string),
            });
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::VisibilityPolicy;
    use std::cell::RefCell;

    /// Records what it was asked to render instead of writing files.
    #[derive(Default)]
    struct RecordingRender {
        calls: RefCell<Vec<(PageKind, PathBuf, usize)>>,
        fail_on: Option<PathBuf>,
    }

    impl PageRender for RecordingRender {
        fn extension(&self) -> &'static str { "html" }

        fn render(&self, model: &PageModel<'_>, destination: &Path) -> Result<(), RenderError> {
            if self.fail_on.as_deref() == Some(destination) {
                return Err(RenderError::Io {
                    path: destination.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            let items = match model {
                PageModel::SeriesIndex { series_list, .. } => series_list.len(),
                PageModel::Series { messages, .. } => messages.len(),
            };
            self.calls.borrow_mut().push((model.kind(), destination.to_path_buf(), items));
            Ok(())
        }
    }

    fn series(id: &str, visibility: AccessLevel) -> Series {
        let mut s = Series::new();
        s.set_id(id.to_string());
        s.set_title(id.to_uppercase());
        s.set_visibility(Some(visibility));
        s.set_messages(Some(vec![]));
        s
    }

    #[test]
    fn test_index_then_public_details_in_order() {
        let list = vec![
            series("a", AccessLevel::Public),
            series("b", AccessLevel::Private),
            series("c", AccessLevel::Public),
        ];
        let renderer = RecordingRender::default();
        let pages = SeriesIndexRender::new(&list)
            .with_index_title("All Series")
            .render(&renderer, &VisibilityPolicy::public_only(), Path::new("out/series.html"))
            .unwrap();

        let calls = renderer.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                (PageKind::SeriesIndex, PathBuf::from("out/series.html"), 3),
                (PageKind::Series, PathBuf::from("out/series-a.html"), 0),
                (PageKind::Series, PathBuf::from("out/series-c.html"), 0),
            ]
        );
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].title.as_deref(), Some("All Series"));
    }

    #[test]
    fn test_failure_stops_the_pass() {
        let list = vec![series("a", AccessLevel::Public), series("c", AccessLevel::Public)];
        let renderer = RecordingRender {
            fail_on: Some(PathBuf::from("out/series-a.html")),
            ..Default::default()
        };
        let result = SeriesIndexRender::new(&list).render(
            &renderer,
            &VisibilityPolicy::public_only(),
            Path::new("out/series.html"),
        );

        assert!(matches!(result, Err(RenderError::Io { .. })));
        assert_eq!(renderer.calls.borrow().len(), 1);
    }

    #[test]
    fn test_series_without_visibility_has_no_page() {
        let mut hidden = series("x", AccessLevel::Public);
        hidden.set_visibility(None);
        assert!(!has_detail_page(&hidden));
    }
}
