use fieldscan::PageSelection;

/// Parse a page selection like "1,3-5" into 0-indexed page ranges.
///
/// Input is 1-indexed (user-facing). Ranges are not expanded here; the page
/// count is only known once the document is open, and the scanner rejects
/// pages past the end before touching any of them.
pub fn parse_page_range(input: &str) -> Result<PageSelection, String> {
    let mut selection = PageSelection::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };
        if start > end {
            return Err(format!("descending page range: '{part}'"));
        }
        selection.push_range(start - 1, end - 1);
    }

    if selection.is_empty() {
        return Err(format!("no pages selected by '{input}'"));
    }
    Ok(selection)
}

fn parse_page(text: &str) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    Ok(page)
}
