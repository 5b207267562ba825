//! The `/` jump prompt: a fuzzy filter over track titles.
//!
//! While the prompt is open it holds text focus, so transport keys typed
//! into it never reach the controller.

#[derive(Debug, Default, Clone)]
pub struct JumpPrompt {
    open: bool,
    query: String,
    /// Position within the current matches.
    cursor: usize,
}

impl JumpPrompt {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.cursor = 0;
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
        self.cursor = 0;
    }

    pub fn pop(&mut self) {
        self.query.pop();
        self.cursor = 0;
    }

    /// Move the highlighted match by `delta`, wrapping within `count`.
    pub fn step(&mut self, delta: isize, count: usize) {
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let len = count as isize;
        let cur = (self.cursor as isize).min(len - 1);
        self.cursor = (cur + delta).rem_euclid(len) as usize;
    }

    /// Indices of `titles` matching the query, in title order.
    pub fn matches<'a, I>(&self, titles: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        titles
            .into_iter()
            .enumerate()
            .filter(|(_, title)| fuzzy_match_positions(title, &self.query).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// The highlighted match, if any.
    pub fn selection<'a, I>(&self, titles: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let matches = self.matches(titles);
        matches
            .get(self.cursor.min(matches.len().saturating_sub(1)))
            .copied()
    }
}

/// Case-insensitive subsequence match.
///
/// Returns the character positions of `title` that matched, or `None` when
/// the query letters do not all appear in order.
pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut title_iter = title.chars().enumerate();

    for qc in query.chars() {
        let qc_low = qc.to_ascii_lowercase();
        loop {
            match title_iter.next() {
                Some((ti, tc)) if tc.to_ascii_lowercase() == qc_low => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}
