//! Auto-trait assertions for types shared across threads.

use static_assertions::assert_impl_all;

use blockhook::{MessageBuilder, Payload, SlackHandler, TemplateFormatter};

#[test]
fn handler_types_are_send_and_sync() {
    assert_impl_all!(SlackHandler: Send, Sync);
    assert_impl_all!(TemplateFormatter: Send, Sync);
    assert_impl_all!(MessageBuilder: Send, Sync);
    assert_impl_all!(Payload: Send, Sync);
}
