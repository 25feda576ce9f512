pub const MAX_ITEMS: usize = 1_000;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_LABEL_LEN: usize = 64;
pub const MAX_URL_LEN: usize = 2_048;
pub const MAX_CUSTOMER_FIELD_LEN: usize = 512;
pub const MAX_LINE_QUANTITY: u32 = 1_000_000;
pub const MAX_RESERVATIONS: usize = 100_000;
pub const MAX_ADMIN_USERS: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_COMMAND_LEN: usize = 16 * 1024;
