use crate::{Effect, Msg, Notification, TranslatorState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TranslatorState, msg: Msg) -> (TranslatorState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SourceLanguageChanged(tag) => {
            state.set_source_language(tag);
            Vec::new()
        }
        Msg::TargetLanguageChanged(tag) => {
            state.set_target_language(tag);
            Vec::new()
        }
        Msg::TranslateClicked => match state.begin_request() {
            Some(request) => vec![Effect::PostRequest(request)],
            None => Vec::new(),
        },
        Msg::Worker(notification) => {
            state = apply(state, notification);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Folds one worker notification into the state. Total: never fails and
/// ignores statuses it does not understand.
pub fn apply(mut state: TranslatorState, notification: Notification) -> TranslatorState {
    match notification {
        Notification::Initiate { file } => state.apply_initiate(&file),
        // Trusted verbatim: no clamping and no monotonicity check.
        Notification::Progress { file, progress } => state.apply_progress(&file, progress),
        Notification::Done { file } => state.apply_done(&file),
        Notification::Ready => state.apply_ready(),
        Notification::Update { output } => state.apply_output(output),
        Notification::Complete => state.apply_complete(),
        Notification::Error { message } => state.apply_error(message),
        Notification::Unknown => {}
    }
    state
}
