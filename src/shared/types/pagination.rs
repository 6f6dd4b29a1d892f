use uuid::Uuid;

/// Keyset pagination cursor.
///
/// Listings are ordered by id; a page starts strictly after `from_id`.
/// The nil UUID means "first page".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub from_id: Uuid,
    pub limit: u16,
}

impl Cursor {
    pub fn new(from_id: Option<Uuid>, limit: u16) -> Self {
        Self {
            from_id: from_id.unwrap_or(Uuid::nil()),
            limit: limit.max(1),
        }
    }

    pub fn first_page(limit: u16) -> Self {
        Self::new(None, limit)
    }
}

/// A page of results plus the cursor for the next page, if any.
#[derive(Debug)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_from_id: Option<Uuid>,
}

impl<T> CursorPage<T> {
    /// Build a page; `id_of` extracts the cursor key of the last item.
    ///
    /// A short page (fewer items than `limit`) is the last one.
    pub fn new(items: Vec<T>, limit: u16, id_of: impl Fn(&T) -> Uuid) -> Self {
        let next_from_id = if items.len() >= limit as usize {
            items.last().map(&id_of)
        } else {
            None
        };
        Self {
            items,
            next_from_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cursor_starts_at_nil() {
        let c = Cursor::new(None, 10);
        assert_eq!(c.from_id, Uuid::nil());
        assert_eq!(c.limit, 10);
    }

    #[test]
    fn zero_limit_is_clamped() {
        assert_eq!(Cursor::first_page(0).limit, 1);
    }

    #[test]
    fn full_page_exposes_next_cursor() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let page = CursorPage::new(ids.clone(), 2, |id| *id);
        assert_eq!(page.next_from_id, Some(ids[1]));

        let short = CursorPage::new(vec![ids[0]], 2, |id| *id);
        assert_eq!(short.next_from_id, None);
    }
}
