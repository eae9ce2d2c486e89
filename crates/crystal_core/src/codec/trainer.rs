use crate::core_api::CoreError;
use crate::layout::{Field, NAME_LENGTH};
use crate::text;

use super::{BankView, BankViewMut};

impl BankView<'_> {
    pub fn player_name(&self) -> Result<String, CoreError> {
        Ok(text::decode(self.field_bytes(Field::PlayerName)?))
    }

    pub fn player_name_raw(&self) -> Result<[u8; NAME_LENGTH], CoreError> {
        let mut out = [0u8; NAME_LENGTH];
        out.copy_from_slice(self.field_bytes(Field::PlayerName)?);
        Ok(out)
    }

    pub fn trainer_id(&self) -> Result<u16, CoreError> {
        self.image.u16_be_at(self.bank.offset(Field::TrainerId)?)
    }
}

impl BankViewMut<'_> {
    pub(crate) fn set_player_name(&mut self, name: &str) -> Result<(), CoreError> {
        let offset = self.bank.offset(Field::PlayerName)?;
        self.image.write_slice(offset, &text::encode(name))
    }

    pub(crate) fn set_trainer_id(&mut self, trainer_id: u16) -> Result<(), CoreError> {
        let offset = self.bank.offset(Field::TrainerId)?;
        self.image.write_u16_be(offset, trainer_id)
    }
}
