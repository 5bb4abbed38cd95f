pub(crate) mod build_list;
pub(crate) mod uniques;
