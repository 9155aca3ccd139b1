use std::{any::Any, borrow::Cow};

/// Best effort textual description of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> Cow<'static, str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("unknown panic payload")
    }
}

/// Byte offset of the character at position `chars`, or the length of `text`
/// if it is shorter.
pub fn char_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

#[macro_export]
macro_rules! truncate_long {
    ($text:expr) => {
        format_args!(
            "{}{}",
            &$text[..$crate::char_offset(&$text, 497)].trim_end(),
            if $crate::char_offset(&$text, 497) < $text.len() {
                "..."
            } else {
                ""
            },
        )
    };
}

/// Logs the error and evaluates to it.
#[macro_export]
macro_rules! logged {
    ($error:expr) => {{
        let error = $error;
        log::error!("{:#}", error);
        error
    }};
}
