use scraper::{ElementRef, Html, Selector};

/// Read-only structural queries over parsed markup.
///
/// html5ever parses best-effort: ill-formed input degrades to whatever tree
/// can be recovered, it never fails. Queries that find nothing return `None`
/// or an empty list; callers decide whether that is an error.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// First element carrying the given id, if any.
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(&format!("#{}", id)).ok()?;
        self.html.select(&selector).next()
    }

    /// Trimmed text of every `tag` element satisfying `pred`, in document
    /// order.
    pub fn texts_matching(&self, tag: &str, pred: impl Fn(&str) -> bool) -> Vec<String> {
        let Ok(selector) = Selector::parse(tag) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(element_text)
            .filter(|text| pred(text))
            .collect()
    }
}

/// First descendant of `scope` matching `tag` plus every class in `classes`.
pub fn first_descendant<'a>(
    scope: ElementRef<'a>,
    tag: &str,
    classes: &[&str],
) -> Option<ElementRef<'a>> {
    let mut css = String::from(tag);
    for class in classes {
        css.push('.');
        css.push_str(class);
    }
    let selector = Selector::parse(&css).ok()?;
    scope.select(&selector).next()
}

/// Attribute value of `element`, if present.
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Concatenated, trimmed text content of `element`.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_by_id_finds_container() {
        let doc = Document::parse(r#"<div id="blog-list"><p>hi</p></div>"#);
        let el = doc.element_by_id("blog-list").expect("container present");
        assert_eq!(element_text(el), "hi");
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn texts_matching_keeps_document_order() {
        let doc = Document::parse(
            r#"<body><p> one.yaml </p><div><p>skip me</p></div><p>two.yaml</p></body>"#,
        );
        let texts = doc.texts_matching("p", |t| t.ends_with(".yaml"));
        assert_eq!(texts, ["one.yaml", "two.yaml"]);
    }

    #[test]
    fn descendant_matches_full_class_list() {
        let doc = Document::parse(
            r#"<div id="list">
                 <div class="row item">wrong</div>
                 <div class="row item py-3"><a href="/a">first</a></div>
                 <div class="row item py-3"><a href="/b">second</a></div>
               </div>"#,
        );
        let list = doc.element_by_id("list").unwrap();
        let row = first_descendant(list, "div", &["row", "item", "py-3"]).unwrap();
        let anchor = first_descendant(row, "a", &[]).unwrap();
        assert_eq!(attr(anchor, "href"), Some("/a"));
    }

    #[test]
    fn malformed_markup_parses_best_effort() {
        let doc = Document::parse("<div id=broken><p>un closed <p>another");
        assert!(doc.element_by_id("broken").is_some());
        let texts = doc.texts_matching("p", |_| true);
        assert_eq!(texts.len(), 2);
    }
}
