// Draft data: individual picks and whole-draft records.

pub mod pick;
pub mod record;
