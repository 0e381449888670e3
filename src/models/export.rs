//! Flattened export records and the CSV column contract.

/// Column priority order for the output file.
///
/// Columns are emitted in this order, filtered to those actually present in
/// the record set, so variant export modes can carry fewer fields without
/// leaving empty columns behind.
pub const COLUMN_ORDER: [&str; 16] = [
    "article_title",
    "article_link",
    "article_author_name",
    "author_id",
    "author_email",
    "views",
    "comments",
    "votes",
    "vote_sum",
    "vote_count",
    "article_id",
    "created_at",
    "updated_at",
    "status",
    "section_id",
    "category_id",
];

/// One output row: the join of an article, its resolved author, and its
/// resolved metrics (or placeholder defaults for either).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub article_title: String,
    pub article_link: String,
    pub article_author_name: String,
    pub author_id: Option<u64>,
    pub author_email: Option<String>,
    pub views: u64,
    pub comments: u64,
    pub votes: u64,
    pub vote_sum: i64,
    pub vote_count: i64,
    pub article_id: u64,
    pub created_at: String,
    pub updated_at: String,
    pub status: String,
    pub section_id: Option<u64>,
    pub category_id: Option<u64>,
}

impl ExportRecord {
    /// Value of a named column, or `None` when the record does not carry it.
    ///
    /// Unknown column names also return `None`, which keeps them out of the
    /// output entirely.
    pub fn value(&self, column: &str) -> Option<String> {
        match column {
            "article_title" => Some(self.article_title.clone()),
            "article_link" => Some(self.article_link.clone()),
            "article_author_name" => Some(self.article_author_name.clone()),
            "author_id" => self.author_id.map(|id| id.to_string()),
            "author_email" => self.author_email.clone(),
            "views" => Some(self.views.to_string()),
            "comments" => Some(self.comments.to_string()),
            "votes" => Some(self.votes.to_string()),
            "vote_sum" => Some(self.vote_sum.to_string()),
            "vote_count" => Some(self.vote_count.to_string()),
            "article_id" => Some(self.article_id.to_string()),
            "created_at" => Some(self.created_at.clone()),
            "updated_at" => Some(self.updated_at.clone()),
            "status" => Some(self.status.clone()),
            "section_id" => self.section_id.map(|id| id.to_string()),
            "category_id" => self.category_id.map(|id| id.to_string()),
            _ => None,
        }
    }
}
