mod member_service;

pub use member_service::{
    delete_member, get_member, list_members, patch_member, register_member, update_member,
};
