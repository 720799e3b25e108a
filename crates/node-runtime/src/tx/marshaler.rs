use cc_03_pipeline::Msg;
use cc_07_cron::TaskMarshaler;
use cc_08_custom::DeleteTimedStateMsg;
use serde::{Deserialize, Serialize};
use shared_types::codec::{decode, encode};
use shared_types::{ChainError, ChainResult, Condition};

/// Messages that may run as scheduled tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CronTaskSum {
    DeleteTimedState(DeleteTimedStateMsg),
}

/// Stored form of a scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronTask {
    pub authenticators: Vec<Condition>,
    pub sum: CronTaskSum,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CronTaskMarshaler;

impl TaskMarshaler for CronTaskMarshaler {
    fn marshal_task(&self, auth: &[Condition], msg: &dyn Msg) -> ChainResult<Vec<u8>> {
        let sum = match msg.as_any().downcast_ref::<DeleteTimedStateMsg>() {
            Some(delete) => CronTaskSum::DeleteTimedState(delete.clone()),
            None => {
                return Err(ChainError::wrong_type(format!(
                    "{} cannot be scheduled",
                    msg.path()
                )))
            }
        };
        encode(&CronTask {
            authenticators: auth.to_vec(),
            sum,
        })
    }

    fn unmarshal_task(&self, raw: &[u8]) -> ChainResult<(Vec<Condition>, Box<dyn Msg>)> {
        let task: CronTask = decode(raw)?;
        let msg: Box<dyn Msg> = match task.sum {
            CronTaskSum::DeleteTimedState(delete) => Box::new(delete),
        };
        Ok((task.authenticators, msg))
    }
}
