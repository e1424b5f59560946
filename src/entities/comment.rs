//! Comments
//!
//! Comments have no collection of their own; they live under an invoice's
//! or estimate's `comments_uri`.

use crate::resource::{FieldType, Manager, Record, Schema};

#[derive(Debug, Clone)]
pub struct Comment {
    record: Record,
}

resource!(
    Comment,
    &Schema {
        name: "Comment",
        collection_uri: None,
        fields: &[("body", FieldType::Text), ("summary", FieldType::Text)],
    },
    |record| Comment { record }
);

impl Comment {
    text_fields!(body => set_body, summary => set_summary);
}

pub type CommentManager = Manager<Comment>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::offline_client;
    use crate::error::Error;
    use crate::resource::Resource;

    #[test]
    fn test_comment_manager_needs_scope() {
        let err = CommentManager::new(offline_client()).unwrap_err();
        assert!(matches!(err, Error::NoCollection { entity: "Comment" }));

        let manager = CommentManager::scoped(offline_client(), "/api/1.0/invoices/3/comments/");
        assert_eq!(manager.collection_uri(), "/api/1.0/invoices/3/comments/");
    }

    #[test]
    fn test_comment_fields() {
        let mut comment = Comment::new(offline_client());
        comment.set_summary("Paid");
        comment.set_body("Paid in cash");
        assert_eq!(comment.summary(), Some("Paid"));
        assert_eq!(comment.to_json()["body"], "Paid in cash");
    }
}
