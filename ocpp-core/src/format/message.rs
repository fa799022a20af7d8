use serde::Serialize;

use super::frame::{Call, CallError, CallResult};

pub const MESSAGE_TYPE_CALL: u64 = 2;
pub const MESSAGE_TYPE_CALL_RESULT: u64 = 3;
pub const MESSAGE_TYPE_CALL_ERROR: u64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Invalid {
    /// Message type id, when the frame got far enough to carry one.
    pub message_type: Option<u64>,
    pub unique_id: Option<String>,
    pub message: String,
    pub err_msg: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallResponse<T> {
    CallResult(CallResult),
    CallError(CallError<T>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OcppMessage<T> {
    Call(Call),
    CallResponse(CallResponse<T>),
    Invalid(Invalid),
}

pub trait EncodeDecode {
    fn encode(&self) -> String;
}

impl<T> CallResponse<T> {
    pub fn get_unique_id(&self) -> String {
        match self {
            CallResponse::CallResult(t) => t.unique_id.clone(),
            CallResponse::CallError(t) => t.unique_id.clone(),
        }
    }
}

impl<T: serde::de::DeserializeOwned> OcppMessage<T> {
    pub fn decode(message: String) -> OcppMessage<T> {
        let raw: serde_json::Value = match serde_json::from_str(&message) {
            Ok(val) => val,
            Err(e) => {
                return OcppMessage::Invalid(Invalid {
                    message_type: None,
                    unique_id: None,
                    message,
                    err_msg: format!("JSON parse error: {}", e),
                });
            }
        };

        let arr = match raw {
            serde_json::Value::Array(arr) => arr,
            _ => {
                return OcppMessage::Invalid(Invalid {
                    message_type: None,
                    unique_id: None,
                    message,
                    err_msg: "Expected JSON array".into(),
                });
            }
        };

        let message_type = arr.first().and_then(|v| v.as_u64());
        let unique_id = arr.get(1).and_then(|v| v.as_str()).map(|s| s.to_string());

        match message_type {
            Some(MESSAGE_TYPE_CALL) if arr.len() == 4 => {
                let action = arr[2].as_str().map(|s| s.to_string());
                let payload = arr[3].clone();

                if let (Some(unique_id), Some(action)) = (unique_id.clone(), action) {
                    OcppMessage::Call(Call {
                        unique_id,
                        action,
                        payload,
                    })
                } else {
                    OcppMessage::Invalid(Invalid {
                        message_type,
                        unique_id,
                        message,
                        err_msg: "Invalid Call structure".into(),
                    })
                }
            }

            Some(MESSAGE_TYPE_CALL_RESULT) if arr.len() == 3 => {
                let payload = arr[2].clone();

                if let Some(unique_id) = unique_id {
                    OcppMessage::CallResponse(CallResponse::CallResult(CallResult {
                        unique_id,
                        payload,
                    }))
                } else {
                    OcppMessage::Invalid(Invalid {
                        message_type,
                        unique_id: None,
                        message,
                        err_msg: "Invalid CallResult structure".into(),
                    })
                }
            }

            Some(MESSAGE_TYPE_CALL_ERROR) if arr.len() == 5 => {
                let error_code = serde_json::from_value::<T>(arr[2].clone());
                let error_description = arr[3].as_str().map(|s| s.to_string());
                let error_details = arr[4].clone();

                if let (Some(unique_id), Ok(error_code), Some(error_description)) =
                    (unique_id.clone(), error_code, error_description)
                {
                    OcppMessage::CallResponse(CallResponse::CallError(CallError {
                        unique_id,
                        error_code,
                        error_description,
                        error_details,
                    }))
                } else {
                    OcppMessage::Invalid(Invalid {
                        message_type,
                        unique_id,
                        message,
                        err_msg: "Invalid CallError structure".into(),
                    })
                }
            }

            Some(MESSAGE_TYPE_CALL) | Some(MESSAGE_TYPE_CALL_RESULT) | Some(MESSAGE_TYPE_CALL_ERROR) => {
                OcppMessage::Invalid(Invalid {
                    message_type,
                    unique_id,
                    message,
                    err_msg: format!("Wrong element count: {}", arr.len()),
                })
            }

            _ => OcppMessage::Invalid(Invalid {
                message_type,
                unique_id: None,
                message,
                err_msg: "Unknown or malformed message".into(),
            }),
        }
    }
}

// A tuple of strings and a `Value` tree always serializes.
fn to_frame<S: Serialize>(frame: &S) -> String {
    serde_json::to_string(frame).unwrap_or_default()
}

impl EncodeDecode for Call {
    fn encode(&self) -> String {
        to_frame(&(MESSAGE_TYPE_CALL, &self.unique_id, &self.action, &self.payload))
    }
}

impl EncodeDecode for CallResult {
    fn encode(&self) -> String {
        to_frame(&(MESSAGE_TYPE_CALL_RESULT, &self.unique_id, &self.payload))
    }
}

impl<T: ToString> EncodeDecode for CallError<T> {
    fn encode(&self) -> String {
        to_frame(&(
            MESSAGE_TYPE_CALL_ERROR,
            &self.unique_id,
            self.error_code.to_string(),
            &self.error_description,
            &self.error_details,
        ))
    }
}

impl<T: ToString> CallResponse<T> {
    pub fn encode(self) -> String {
        match self {
            CallResponse::CallResult(t) => t.encode(),
            CallResponse::CallError(t) => t.encode(),
        }
    }
}
