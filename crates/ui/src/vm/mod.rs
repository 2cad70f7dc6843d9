mod attempt_vm;

pub use attempt_vm::{
    AttemptVm, ConfirmationVm, NoticeTone, NoticeVm, map_confirmation, map_notice, start_attempt,
};
