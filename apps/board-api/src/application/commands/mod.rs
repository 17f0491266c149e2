pub mod add_comment;
pub mod create_idea;
